//! Build version strings of the `safe-dump` binary.

use git_version::git_version;
use target_info::Target;

/// Name the full version string starts with.
pub const CLIENT_NAME: &str = "SafeDump";

/// Abbreviated commit the binary was built from, `+` suffixed for a dirty tree.
///
/// Empty when the sources carry no git information.
pub const GIT_COMMIT: &str = git_version!(
    args = ["--always", "--dirty=+", "--abbrev=7", "--match=^$"],
    fallback = ""
);

lazy_static::lazy_static! {
    /// `v<crate version>` followed by the commit, e.g. `v0.1.0-67da032+`.
    pub static ref SHORT_VERSION: String = short_version(env!("CARGO_PKG_VERSION"), GIT_COMMIT);

    /// [`SHORT_VERSION`] prefixed with [`CLIENT_NAME`], e.g. `SafeDump/v0.1.0-67da032+`.
    pub static ref VERSION: String = format!("{CLIENT_NAME}/{}", *SHORT_VERSION);
}

fn short_version(crate_version: &str, commit: &str) -> String {
    match commit {
        "" => format!("v{crate_version}"),
        commit => format!("v{crate_version}-{commit}"),
    }
}

/// [`VERSION`] with the target platform appended, e.g. `SafeDump/v0.1.0-67da032+/x86_64-linux`.
pub fn version_with_platform() -> String {
    format!("{}/{}-{}", *VERSION, Target::arch(), Target::os())
}
