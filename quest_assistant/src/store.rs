use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Clone, Debug)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
    pub index: usize,
}

pub struct CredentialStore {
    access_path: PathBuf,
    refresh_path: PathBuf,
}

impl CredentialStore {
    pub fn new<P: Into<PathBuf>>(access_path: P, refresh_path: P) -> Self {
        CredentialStore {
            access_path: access_path.into(),
            refresh_path: refresh_path.into(),
        }
    }

    // Line N of the access file pairs with line N of the refresh file. Pairs
    // zip to the shorter list; a length mismatch is worth a warning but is
    // not a reason to abort.
    pub fn load(&self) -> Result<Vec<CredentialPair>> {
        let access_tokens = read_token_lines(&self.access_path)?;
        let refresh_tokens = read_token_lines(&self.refresh_path)?;

        if access_tokens.len() != refresh_tokens.len() {
            println!("Warning: number of access tokens and refresh tokens don't match!");
        }

        Ok(access_tokens
            .into_iter()
            .zip(refresh_tokens)
            .enumerate()
            .map(|(index, (access_token, refresh_token))| CredentialPair {
                access_token,
                refresh_token,
                index,
            })
            .collect())
    }

    // Replaces the single line belonging to `index`, leaving every other
    // line byte-identical. Written through a temp file in the same directory
    // and renamed over the original so a crash can't leave a half-written
    // store behind.
    pub fn update_access_token(&self, index: usize, token: &str) -> Result<()> {
        let contents = fs::read_to_string(&self.access_path)
            .with_context(|| format!("failed to read {}", self.access_path.display()))?;
        let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();

        // Indices count non-blank lines, matching load order.
        let mut seen = 0;
        let mut target = None;
        for (position, line) in lines.iter().enumerate() {
            if !line.trim().is_empty() {
                if seen == index {
                    target = Some(position);
                    break;
                }
                seen += 1;
            }
        }
        let position = target.context("token index out of range")?;
        lines[position] = token.to_string();

        let dir = self.access_path.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to stage update for {}", self.access_path.display()))?;
        for line in &lines {
            writeln!(staged, "{}", line)?;
        }
        staged
            .persist(&self.access_path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to update {}", self.access_path.display()))?;
        Ok(())
    }
}

fn read_token_lines(path: &Path) -> Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => bail!("{} file not found!", path.display()),
    };
    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        bail!("{} is empty!", path.display());
    }
    Ok(lines)
}

// Missing proxy file just means no proxies.
pub fn load_proxies(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => {
            println!("Error: {} file not found!", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path, access: &str, refresh: &str) -> CredentialStore {
        let access_path = dir.join("bearer.txt");
        let refresh_path = dir.join("refresh.txt");
        fs::write(&access_path, access).unwrap();
        fs::write(&refresh_path, refresh).unwrap();
        CredentialStore::new(access_path, refresh_path)
    }

    #[test]
    fn load_pairs_lines_in_order() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "a0\na1\na2\n", "r0\nr1\nr2\n");
        let pairs = store.load().unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1].access_token, "a1");
        assert_eq!(pairs[1].refresh_token, "r1");
        assert_eq!(pairs[1].index, 1);
    }

    #[test]
    fn load_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "a0\n\na1\n", "r0\nr1\n");
        let pairs = store.load().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].access_token, "a1");
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("bearer.txt"), dir.path().join("refresh.txt"));
        assert!(store.load().is_err());
    }

    #[test]
    fn load_fails_on_empty_file() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "\n\n", "r0\n");
        assert!(store.load().is_err());
    }

    #[test]
    fn load_zips_to_shorter_list_on_mismatch() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "a0\na1\na2\n", "r0\nr1\n");
        let pairs = store.load().unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn update_rewrites_only_the_target_line() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "a0\na1\na2\n", "r0\nr1\nr2\n");
        store.update_access_token(1, "fresh").unwrap();
        let contents = fs::read_to_string(dir.path().join("bearer.txt")).unwrap();
        assert_eq!(contents, "a0\nfresh\na2\n");
    }

    #[test]
    fn update_out_of_range_is_an_error() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "a0\n", "r0\n");
        assert!(store.update_access_token(3, "fresh").is_err());
        let contents = fs::read_to_string(dir.path().join("bearer.txt")).unwrap();
        assert_eq!(contents, "a0\n");
    }

    #[test]
    fn load_proxies_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_proxies(&dir.path().join("proxy.txt")).is_empty());
    }

    #[test]
    fn load_proxies_reads_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("proxy.txt");
        fs::write(&path, "http://p1:8080\n\nhttp://p2:8080\n").unwrap();
        assert_eq!(load_proxies(&path), vec!["http://p1:8080", "http://p2:8080"]);
    }
}
