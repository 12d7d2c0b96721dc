pub mod extract;
pub mod list;
pub mod pack;

/// Which entry payload format a container holds.
#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum Codec {
    /// Run-length pixel entries
    Ebp,
    /// Huffman text entries
    Srp,
}

impl Codec {
    /// Extension appended to an entry name for its decoded form, and
    /// expected (with the codec name) on files being packed.
    pub fn decoded_extension(self) -> &'static str {
        match self {
            Codec::Ebp => "bmp",
            Codec::Srp => "txt",
        }
    }
}

#[derive(clap::Subcommand)]
pub enum FgaCommands {
    /// Extract an FGA container into a directory
    Extract(extract::ExtractArgs),
    /// List the entries of an FGA container
    List(list::ListArgs),
    /// Pack a directory of decoded files into an FGA container
    Pack(pack::PackArgs),
}

impl FgaCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            FgaCommands::Extract(extract) => extract.handle(),
            FgaCommands::List(list) => list.handle(),
            FgaCommands::Pack(pack) => pack.handle(),
        }
    }
}
