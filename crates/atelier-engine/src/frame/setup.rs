use crate::scene::Command;

/// Output of the single setup pass.
///
/// The first background command is held apart so headless hosts can apply it
/// once; everything else becomes the prefix re-seeded at the start of every
/// tick, which keeps setup-time drawing visible on every frame.
#[derive(Debug, Clone, Default)]
pub struct SetupCapture {
    pub background: Option<Command>,
    pub prefix: Vec<Command>,
    pub background_applied: bool,
}

impl SetupCapture {
    /// Splits setup output into the captured background and the replay prefix.
    pub fn from_setup_output(commands: Vec<Command>) -> Self {
        let mut background = None;
        let mut prefix = Vec::with_capacity(commands.len());

        for cmd in commands {
            if background.is_none() && cmd.is_background() {
                background = Some(cmd);
            } else {
                prefix.push(cmd);
            }
        }

        Self {
            background,
            prefix,
            background_applied: false,
        }
    }

    /// Returns the background once; later calls yield `None`.
    pub fn take_background_once(&mut self) -> Option<Command> {
        if self.background_applied {
            return None;
        }
        let bg = self.background.clone()?;
        self.background_applied = true;
        Some(bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Args, CommandBuffer, Op};

    #[test]
    fn only_first_background_is_captured() {
        let mut buf = CommandBuffer::new();
        buf.record(Op::Rect, Args::new());
        buf.record(Op::Background, Args::new().with("color", 1.0));
        buf.record(Op::Background, Args::new().with("color", 2.0));
        let cap = SetupCapture::from_setup_output(buf.drain());

        assert_eq!(cap.background.as_ref().map(|c| c.seq()), Some(2));
        assert_eq!(cap.prefix.len(), 2);
        assert_eq!(cap.prefix[1].op, Op::Background);
    }

    #[test]
    fn background_is_handed_out_once() {
        let mut buf = CommandBuffer::new();
        buf.record(Op::Background, Args::new());
        let mut cap = SetupCapture::from_setup_output(buf.drain());
        assert!(cap.take_background_once().is_some());
        assert!(cap.take_background_once().is_none());
    }
}
