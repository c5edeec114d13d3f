//! Line-oriented progress output on stdout.

use std::io::Write;
use std::path::Path;

use blobmirror_core::DestinationKey;
use blobmirror_sync::{DeleteResult, Reporter, UploadResult};

/// Prints `Uploading SRC ⭢ KEY... ` before each file and its outcome once it
/// is known, so slow uploads show which file is in flight.
pub struct ConsoleReporter<W: Write> {
    out: W,
    prefix: &'static str,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, dry_run: bool) -> Self {
        Self {
            out,
            prefix: if dry_run { "[dry-run] " } else { "" },
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    // Progress output is best effort; a closed stdout must not abort the run.
    fn start(&mut self, line: std::fmt::Arguments<'_>) {
        let _ = write!(self.out, "{}{line}... ", self.prefix);
        let _ = self.out.flush();
    }

    fn finish(&mut self, outcome: &dyn std::fmt::Display) {
        let _ = writeln!(self.out, "{outcome}");
        let _ = self.out.flush();
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn upload_started(&mut self, path: &Path, key: &DestinationKey) {
        self.start(format_args!("Uploading {} ⭢ {key}", path.display()));
    }

    fn upload_finished(&mut self, result: &UploadResult) {
        self.finish(&result.outcome);
    }

    fn delete_started(&mut self, key: &str) {
        self.start(format_args!("Deleting {key}"));
    }

    fn delete_finished(&mut self, result: &DeleteResult) {
        self.finish(&result.outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobmirror_sync::{DeleteOutcome, UploadOutcome};
    use std::path::PathBuf;

    fn upload(outcome: UploadOutcome) -> UploadResult {
        UploadResult {
            path: PathBuf::from("public/index.html"),
            key: DestinationKey::from("site/index.html"),
            content_type: "text/html",
            outcome,
        }
    }

    #[test]
    fn upload_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let path = Path::new("public/index.html");
        let key = DestinationKey::from("site/index.html");

        reporter.upload_started(path, &key);
        reporter.upload_finished(&upload(UploadOutcome::Uploaded));
        reporter.upload_started(path, &key);
        reporter.upload_finished(&upload(UploadOutcome::Skipped));
        reporter.upload_started(path, &key);
        reporter.upload_finished(&upload(UploadOutcome::Failed {
            error: "timeout".into(),
        }));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "Uploading public/index.html ⭢ site/index.html... done\n\
             Uploading public/index.html ⭢ site/index.html... skipped\n\
             Uploading public/index.html ⭢ site/index.html... failed, error: timeout\n"
        );
    }

    #[test]
    fn dry_run_delete_line() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.delete_started("site/old.html");
        reporter.delete_finished(&DeleteResult {
            key: "site/old.html".into(),
            outcome: DeleteOutcome::WouldDelete,
        });

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "[dry-run] Deleting site/old.html... would delete\n");
    }
}
