use std::path::{Path, PathBuf};

/// Placeholder character replaced by the frame number.
pub const PLACEHOLDER: char = '#';

/// Expands the first `#` run in the file name to the zero-padded frame number.
///
/// The run length sets the minimum width (`frame-####.png` at frame 7 gives
/// `frame-0007.png`); wider numbers are never truncated. Directory components
/// are left alone.
pub fn expand_template(template: &Path, frame: u64) -> PathBuf {
    let Some(name) = template.file_name().and_then(|n| n.to_str()) else {
        return template.to_path_buf();
    };
    let Some(start) = name.find(PLACEHOLDER) else {
        return template.to_path_buf();
    };

    let run = name[start..].chars().take_while(|&c| c == PLACEHOLDER).count();
    let expanded = format!(
        "{}{:0width$}{}",
        &name[..start],
        frame,
        &name[start + run..],
        width = run
    );
    template.with_file_name(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_run_width() {
        assert_eq!(
            expand_template(Path::new("out/frame-####.png"), 7),
            PathBuf::from("out/frame-0007.png")
        );
    }

    #[test]
    fn wide_numbers_are_not_truncated() {
        assert_eq!(expand_template(Path::new("f##.png"), 1234), PathBuf::from("f1234.png"));
    }

    #[test]
    fn only_first_run_is_expanded() {
        assert_eq!(expand_template(Path::new("a##-b##.png"), 3), PathBuf::from("a03-b##.png"));
    }

    #[test]
    fn directories_are_untouched() {
        assert_eq!(
            expand_template(Path::new("runs/##/shot.png"), 5),
            PathBuf::from("runs/##/shot.png")
        );
    }
}
