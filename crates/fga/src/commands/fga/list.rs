use clap::Args;
use fga_container::FgaArchive;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};

#[derive(Args)]
pub struct ListArgs {
    /// An input FGA container
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut fga = FgaArchive::new(f)?;

        for i in 0..fga.len() {
            let entry = fga.by_index(i)?;
            println!("{:>10}  {:#010x}  {}", entry.size(), entry.offset(), entry.name());
        }
        println!(
            "{} entries, {} payload bytes",
            fga.len(),
            fga.total_size().unwrap_or_default()
        );

        Ok(())
    }
}
