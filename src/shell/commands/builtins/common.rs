use chrono::{Local, TimeZone};

use crate::shell::context::CommandContext;

/// Write `<command>: <message>` on the command's stderr.
pub fn report(ctx: &CommandContext<'_>, command: &str, message: impl std::fmt::Display) {
    ctx.stderr.write(&format!("{}: {}\n", command, message));
}

/// Contents of the named files, or stdin when none are named.
///
/// Unreadable files are reported and skipped; the second value is the exit
/// code the command should return.
pub fn read_inputs(ctx: &CommandContext<'_>, command: &str, files: &[String]) -> (Vec<String>, i32) {
    if files.is_empty() {
        return (vec![ctx.stdin.read()], 0);
    }

    let mut contents = Vec::new();
    let mut code = 0;
    for file in files {
        match ctx.fs.read_file(file, &ctx.cwd) {
            Ok(content) => contents.push(content),
            Err(e) => {
                report(ctx, command, e);
                code = 1;
            }
        }
    }
    (contents, code)
}

/// Last component of a path as typed (`a/b/` gives `b`).
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Destination for copying or moving `source` into `dest`.
pub fn target_path(source: &str, dest: &str, into_dir: bool) -> String {
    if into_dir {
        format!("{}/{}", dest.trim_end_matches('/'), basename(source))
    } else {
        dest.to_string()
    }
}

/// `Mon dd HH:MM` in local time, as `ls -l` prints it.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%b %e %H:%M").to_string(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("dir/"), "dir");
        assert_eq!(basename("plain"), "plain");
    }

    #[test]
    fn test_target_path() {
        assert_eq!(target_path("src/a.txt", "dest/", true), "dest/a.txt");
        assert_eq!(target_path("src/a.txt", "b.txt", false), "b.txt");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let formatted = format_timestamp(0);
        assert_eq!(formatted.len(), "Jan  1 00:00".len());
    }
}
