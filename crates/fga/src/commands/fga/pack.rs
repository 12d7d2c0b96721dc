use clap::Args;
use fga_container::FgaWriter;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;
use walkdir::WalkDir;

use super::Codec;

#[derive(Args)]
pub struct PackArgs {
    /// An input directory of decoded files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target FGA container
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The payload codec to encode entries with
    #[arg(short, long, value_enum)]
    codec: Codec,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    /// Files are picked up by their decoded naming convention, e.g.
    /// `TITLE.EBP.bmp` becomes the entry `TITLE.EBP`.
    fn wanted_suffix(&self) -> String {
        let codec = match self.codec {
            Codec::Ebp => "EBP",
            Codec::Srp => "SRP",
        };
        format!(".{}.{}", codec, self.codec.decoded_extension())
    }

    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let suffix = self.wanted_suffix();
        let mut files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| e.file_name().to_string_lossy().ends_with(&suffix))
            .collect::<Vec<_>>();
        files.sort_by_key(|e| e.file_name().to_owned());

        if files.is_empty() {
            return Err(miette!(
                "no *{} files found under {}",
                suffix,
                self.directory.display()
            ));
        }

        let out = if !self.overwrite {
            File::create_new(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        } else {
            File::create(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        };

        let mut fga = FgaWriter::new(out);

        for file in files {
            let file_name = file.file_name().to_string_lossy();
            // Strip the decoded extension to recover the entry name.
            let name = &file_name[..file_name.len() - self.codec.decoded_extension().len() - 1];
            info!("packing {}", name);

            let source = std::fs::read(file.path())
                .into_diagnostic()
                .context(format!("reading {}", file.path().display()))?;

            let block = match self.codec {
                Codec::Ebp => fga_codec::rle::encode(&source),
                Codec::Srp => fga_codec::huffman::encode(&source),
            }
            .context(format!("encoding {}", file.path().display()))?;

            fga.start_file(name)
                .context(format!("starting entry for {name}"))?;
            fga.write_all(&block).into_diagnostic()?;
        }

        fga.finish().context("finalizing fga container")?;

        Ok(())
    }
}
