use clap::Args;
use fga_container::FgaArchive;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use super::Codec;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input FGA container
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// The payload codec of the container's entries
    #[arg(short, long, value_enum)]
    codec: Codec,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let mut f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut fga = FgaArchive::new(&mut f)?;

        let count = fga.len();
        for i in 0..count {
            let mut entry = fga.by_index(i)?;
            let name = entry.name().to_owned();

            let mut raw = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut raw)
                .into_diagnostic()
                .context(format!("reading entry {name}"))?;

            // Keep the stored bytes next to the decoded form, so a repack
            // can be verified against the untouched originals.
            self.write_output(&self.directory.join(&name), &raw)?;

            let decoded = match self.codec {
                Codec::Ebp => fga_codec::rle::decode(&raw),
                Codec::Srp => fga_codec::huffman::decode(&raw),
            }
            .context(format!("decoding entry {name}"))?;

            let decoded_name = format!("{name}.{}", self.codec.decoded_extension());
            self.write_output(&self.directory.join(decoded_name), &decoded)?;
        }
        Ok(())
    }

    fn write_output(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        info!("writing {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .context(format!("creating directory {}", parent.display()))?;
        }
        let mut out = if !self.overwrite {
            File::create_new(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        } else {
            File::create(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        };
        out.write_all(bytes).into_diagnostic()?;

        Ok(())
    }
}
