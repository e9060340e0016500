//! SSH key pairs and password-authenticated remote commands
//!
//! Key pairs are produced with the `ssh-keygen` CLI. Remote commands during
//! bootstrap use libssh2 (blocking), moved off the async runtime with
//! `spawn_blocking`.

use crate::error::{DriverError, Result};
use async_trait::async_trait;
use ssh2::Session;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Operator key pair stored as `<path>` and `<path>.pub`
#[derive(Debug, Clone)]
pub struct SshKeyPair {
    private_key_path: PathBuf,
    public_key: String,
}

impl SshKeyPair {
    /// Reuse the key pair at `path` if both halves exist, otherwise generate
    /// a new RSA pair there. The public key is always read back from disk.
    pub async fn ensure(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let public_path = public_key_path(path);

        if path.exists() && public_path.exists() {
            tracing::debug!("Reusing SSH key pair at {}", path.display());
        } else {
            generate(path).await?;
        }

        let public_key = tokio::fs::read_to_string(&public_path)
            .await?
            .trim()
            .to_string();
        if public_key.is_empty() {
            return Err(DriverError::KeyGeneration(format!(
                "public key {} is empty",
                public_path.display()
            )));
        }

        Ok(Self {
            private_key_path: path.to_path_buf(),
            public_key,
        })
    }

    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }

    /// Public key in authorized_keys format, without trailing newline
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

/// `<path>.pub`
pub fn public_key_path(path: &Path) -> PathBuf {
    let mut public = path.as_os_str().to_owned();
    public.push(".pub");
    PathBuf::from(public)
}

async fn generate(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tracing::info!("Generating SSH key pair at {}", path.display());

    let output = Command::new("ssh-keygen")
        .args(["-t", "rsa", "-b", "2048", "-N", "", "-q", "-f"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| DriverError::KeyGeneration(format!("failed to run ssh-keygen: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DriverError::KeyGeneration(stderr.trim().to_string()));
    }

    Ok(())
}

/// Where to reach a machine over SSH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
}

impl SshTarget {
    pub fn new(host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
        }
    }
}

impl std::fmt::Display for SshTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.port)
    }
}

/// Runs one command per fresh session, authenticated by password
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Returns the command's stdout. A non-zero exit status is an error.
    async fn run(&self, target: &SshTarget, password: &str, command: &str) -> Result<String>;
}

/// libssh2 implementation of [`RemoteShell`]
#[derive(Debug, Clone, Default)]
pub struct Ssh2Shell;

impl Ssh2Shell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteShell for Ssh2Shell {
    async fn run(&self, target: &SshTarget, password: &str, command: &str) -> Result<String> {
        let target = target.clone();
        let password = password.to_string();
        let command = command.to_string();

        tokio::task::spawn_blocking(move || run_blocking(&target, &password, &command))
            .await
            .map_err(|e| DriverError::Access(format!("SSH task failed: {}", e)))?
    }
}

fn run_blocking(target: &SshTarget, password: &str, command: &str) -> Result<String> {
    let addr = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(|e| DriverError::Access(format!("cannot resolve {}: {}", target, e)))?
        .next()
        .ok_or_else(|| DriverError::Access(format!("no address for {}", target)))?;

    let tcp = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| DriverError::Access(format!("failed to connect to {}: {}", target, e)))?;

    let mut session =
        Session::new().map_err(|e| DriverError::Access(format!("SSH session: {}", e)))?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| DriverError::Access(format!("SSH handshake failed: {}", e)))?;
    session
        .userauth_password(&target.user, password)
        .map_err(|e| DriverError::Access(format!("password authentication failed: {}", e)))?;

    let mut channel = session
        .channel_session()
        .map_err(|e| DriverError::Access(format!("SSH channel: {}", e)))?;
    channel
        .exec(command)
        .map_err(|e| DriverError::Access(format!("SSH exec: {}", e)))?;

    let mut stdout = String::new();
    channel.read_to_string(&mut stdout)?;
    let mut stderr = String::new();
    channel.stderr().read_to_string(&mut stderr)?;
    channel
        .wait_close()
        .map_err(|e| DriverError::Access(format!("SSH close: {}", e)))?;

    let status = channel
        .exit_status()
        .map_err(|e| DriverError::Access(format!("SSH exit status: {}", e)))?;
    if status != 0 {
        return Err(DriverError::Access(format!(
            "command exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }

    Ok(stdout)
}
