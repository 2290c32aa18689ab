use clap::ValueEnum;
use fob_pack::{Format, Platform};

/// Output format as spelled on the command line
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum FormatArg {
    /// ES module
    #[value(name = "es", alias = "esm", alias = "module")]
    Es,

    /// CommonJS
    #[value(name = "cjs", alias = "commonjs")]
    Cjs,

    /// Universal module definition; installs a global when no loader is present
    #[value(name = "umd", alias = "global")]
    Umd,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Es => Format::Module,
            FormatArg::Cjs => Format::CommonJs,
            FormatArg::Umd => Format::Global,
        }
    }
}

/// Target platform environment
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum PlatformArg {
    /// Browser export conditions and main fields
    #[value(name = "browser")]
    Browser,

    /// Node.js export conditions and main fields
    #[value(name = "node")]
    Node,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Browser => Platform::Browser,
            PlatformArg::Node => Platform::Node,
        }
    }
}
