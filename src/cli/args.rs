use clap::Parser;
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "pdf-squeeze")]
#[command(
    author,
    version,
    about = "Merge PDF documents and squeeze the result under a size budget"
)]
pub struct Args {
    /// Input PDF files, merged in the order given
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path (defaults to the first input with a -merged suffix)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target size in megabytes (missing or invalid values fall back to 9)
    #[arg(short = 't', long)]
    pub target_size: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Get the output path, defaulting to "<first input>-merged.pdf"
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let first = &self.inputs[0];
            let stem = first
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            first.with_file_name(format!("{stem}-merged.pdf"))
        })
    }

    /// Settings derived from the raw target-size flag
    pub fn settings(&self) -> Settings {
        Settings::from_target_field(self.target_size.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(inputs: &[&str], target_size: Option<&str>) -> Args {
        Args {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            output: None,
            target_size: target_size.map(String::from),
            verbose: 0,
        }
    }

    #[test]
    fn test_default_output_path() {
        let args = args(&["scans/report.pdf", "b.pdf"], None);
        assert_eq!(args.output_path(), PathBuf::from("scans/report-merged.pdf"));
    }

    #[test]
    fn test_explicit_output_path_wins() {
        let mut args = args(&["a.pdf"], None);
        args.output = Some(PathBuf::from("out.pdf"));
        assert_eq!(args.output_path(), PathBuf::from("out.pdf"));
    }

    #[test]
    fn test_settings_from_target_flag() {
        assert_eq!(
            args(&["a.pdf"], Some("2")).settings().target_size_kb,
            2.0 * 1024.0
        );
        assert_eq!(args(&["a.pdf"], None).settings(), Settings::default());
        assert_eq!(
            args(&["a.pdf"], Some("bogus")).settings(),
            Settings::default()
        );
    }
}
