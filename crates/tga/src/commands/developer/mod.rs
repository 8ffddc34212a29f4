pub mod extract;
pub mod merge;

#[derive(clap::Subcommand)]
pub enum DeveloperCommands {
    /// Extract every developer entry into a directory
    Extract(extract::ExtractArgs),
    /// Merge a directory of tagged files into the developer area
    Merge(merge::MergeArgs),
}

impl DeveloperCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            DeveloperCommands::Extract(extract) => extract.handle(),
            DeveloperCommands::Merge(merge) => merge.handle(),
        }
    }
}
