use clap::{Args, ValueEnum};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum View {
    /// Any signed-in member.
    Dashboard,
    /// Admins only.
    Admin,
}

#[derive(Clone, Debug, Args)]
pub struct OpenArgs {
    pub view: View,
}
