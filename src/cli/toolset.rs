//! Toolset files: JSON lists of tool names used to narrow the advertised tools.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Toolset configuration loaded from JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsetConfig {
    /// List of individual tool names to enable
    pub tools: Vec<String>,
}

/// Load toolset JSON file and extract tool names
pub async fn load_toolset_file(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read toolset file: {}", path.display()))?;

    let toolset: ToolsetConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse toolset file: {}", path.display()))?;

    Ok(toolset.tools)
}

/// Load and merge multiple toolsets into one sorted, deduplicated list
pub async fn load_and_merge_toolsets(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut all_tools = BTreeSet::new();

    for path in paths {
        all_tools.extend(load_toolset_file(path).await?);
    }

    Ok(all_tools.into_iter().collect())
}

/// Place an unqualified tool name under `namespace`.
pub fn qualify(name: &str, namespace: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn merges_and_deduplicates() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        write!(first, r#"{{"tools": ["browser.click", "browser.navigate"]}}"#).unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        write!(second, r#"{{"tools": ["browser.navigate", "get_text"]}}"#).unwrap();

        let tools = load_and_merge_toolsets(&[
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ])
        .await
        .unwrap();
        assert_eq!(tools, ["browser.click", "browser.navigate", "get_text"]);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "tools: [browser.click]").unwrap();
        let err = load_toolset_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse toolset file"));
    }

    #[test]
    fn qualify_leaves_qualified_names_alone() {
        assert_eq!(qualify("navigate", "browser"), "browser.navigate");
        assert_eq!(qualify("web.navigate", "browser"), "web.navigate");
    }
}
