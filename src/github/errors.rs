use crate::extract::ExtractError;
use octocrab::Error as OctocrabError;

#[derive(Debug)]
pub enum GitHubError {
    /// A required setting (token, organization, repository, team members) is empty
    ConfigurationMissing(String),
    /// The API answered with a non-2xx status
    Http { status: u16, body: String },
    /// Transport or client-side failure inside octocrab
    Api(OctocrabError),
    /// A 2xx body did not have the expected shape
    Decode {
        route: String,
        source: serde_json::Error,
    },
    Uri(String),
    Extract(ExtractError),
}

impl GitHubError {
    pub fn missing(field: &str) -> Self {
        GitHubError::ConfigurationMissing(field.to_string())
    }

    /// HTTP status when the failure came from the remote API
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<OctocrabError> for GitHubError {
    fn from(err: OctocrabError) -> Self {
        GitHubError::Api(err)
    }
}

impl From<ExtractError> for GitHubError {
    fn from(err: ExtractError) -> Self {
        GitHubError::Extract(err)
    }
}

impl std::fmt::Display for GitHubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitHubError::ConfigurationMissing(field) => {
                writeln!(f, "GitHub Configuration Error")?;
                writeln!(f, "─────────────────────────")?;
                write!(f, "📂 Setting '{field}' is not configured\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → Show current settings: team-pulse settings show")?;
                writeln!(f, "   → Set connection: team-pulse settings set --organization <org> --repository <repo|*> --token <token>")?;
                write!(f, "   → Track members: team-pulse settings members add <handle>")
            }
            GitHubError::Http { status, body } => {
                writeln!(f, "GitHub API Error")?;
                writeln!(f, "────────────────")?;
                writeln!(f, "🌐 HTTP {status}: {}", body.trim())?;
                writeln!(f)?;
                match status {
                    401 => {
                        writeln!(f, "🔧 AUTHENTICATION FAILED:")?;
                        writeln!(f, "   → Token is invalid or expired")?;
                        write!(f, "   → Create a new token at: https://github.com/settings/tokens")
                    }
                    403 => {
                        writeln!(f, "🔧 PERMISSION DENIED OR RATE LIMITED:")?;
                        writeln!(f, "   → Token may lack 'repo' or 'actions:read' scope")?;
                        write!(f, "   → Lower http.max_concurrency if secondary rate limits are hit")
                    }
                    404 => {
                        writeln!(f, "🔧 RESOURCE NOT FOUND:")?;
                        writeln!(f, "   → Organization, repository or workflow id may be wrong")?;
                        write!(f, "   → Private repositories answer 404 without access")
                    }
                    _ => {
                        writeln!(f, "🔧 TROUBLESHOOTING:")?;
                        writeln!(f, "   → Check the base URL (Enterprise: https://<host>/api/v3)")?;
                        write!(f, "   → Check GitHub status: https://status.github.com")
                    }
                }
            }
            GitHubError::Api(octocrab_err) => {
                writeln!(f, "GitHub Client Error")?;
                writeln!(f, "───────────────────")?;
                write!(f, "🌐 {octocrab_err}\n\n")?;
                writeln!(f, "🔧 TROUBLESHOOTING:")?;
                writeln!(f, "   → Test connection: curl -I https://api.github.com")?;
                write!(f, "   → Check proxy and firewall settings")
            }
            GitHubError::Decode { route, source } => {
                writeln!(f, "Unexpected GitHub Response")?;
                writeln!(f, "──────────────────────────")?;
                write!(f, "📄 {route}: {source}")
            }
            GitHubError::Uri(uri) => {
                write!(f, "Invalid GitHub URL: {uri}")
            }
            GitHubError::Extract(err) => {
                write!(f, "Artifact Extraction Error: {err}")
            }
        }
    }
}

impl std::error::Error for GitHubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitHubError::Api(err) => Some(err),
            GitHubError::Decode { source, .. } => Some(source),
            GitHubError::Extract(err) => Some(err),
            _ => None,
        }
    }
}
