use super::{Args, Command, CommandMeta, Op};

/// Recorded command stream for an engine instance.
///
/// Performance characteristics:
/// - `record()` is O(1) amortized
/// - `clear()` keeps allocated capacity for reuse
///
/// The sequence counter lives as long as the buffer: `clear()` never resets
/// it, so a `seq` identifies one recording across all frames.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    next_seq: u64,
}

impl CommandBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fresh command and returns its sequence number.
    pub fn record(&mut self, op: Op, args: Args) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.commands.push(Command {
            op,
            args,
            meta: CommandMeta { seq, frame: None },
        });
        seq
    }

    /// Empties the buffer. The sequence counter is left untouched.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Appends already-sequenced commands verbatim (the setup replay prefix).
    pub fn reseed(&mut self, prefix: &[Command]) {
        self.commands.extend_from_slice(prefix);
    }

    /// Inserts an already-sequenced command at position zero.
    pub fn insert_front(&mut self, command: Command) {
        self.commands.insert(0, command);
    }

    /// Highest sequence number handed out so far (0 before the first record).
    #[inline]
    pub fn last_seq(&self) -> u64 {
        self.next_seq
    }

    /// Tags every command recorded after `after_seq` with `frame`.
    pub fn tag_since(&mut self, after_seq: u64, frame: u64) {
        for cmd in self.commands.iter_mut().filter(|c| c.meta.seq > after_seq) {
            cmd.meta.frame = Some(frame);
        }
    }

    /// Removes and returns all commands, keeping the sequence counter.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Returns commands in recording order.
    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
