//! Compare the running CLI against the version a template descriptor asks for

use semver::Version;

/// Warning text when the template expects a newer CLI than the one running
///
/// Unparseable versions on either side produce no warning.
pub fn check_compatibility(
    cli_version: &str,
    template_version: Option<&str>,
    upgrade_command: &str,
) -> Option<String> {
    let template_version = template_version?;
    let cli = parse_version(cli_version)?;
    let wanted = parse_version(template_version)?;

    (cli < wanted).then(|| {
        format!(
            "This template was written for CLI version {} or newer (running {}). Consider updating: {}",
            wanted, cli, upgrade_command
        )
    })
}

/// Parse `1.2.3` or `v1.2.3`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}
