//! VPSie machine driver

use crate::client::{CreateVpsie, VpsieApi, VpsieClient};
use crate::options::DriverOptions;
use crate::state::{STATUS_DELETED, STATUS_RESTARTED, STATUS_STARTED, lifecycle_state};
use async_trait::async_trait;
use machine_driver::{
    BootstrapReport, CatalogEntry, CatalogSource, CatalogValidator, DriverError, KeyInstaller,
    LifecycleState, MachineDriver, RemoteShell, ResourceKind, Result, Ssh2Shell, SshKeyPair,
    SshTarget, StateProbe,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DRIVER_NAME: &str = "vpsie";

/// Provider-side identity of the managed machine
///
/// `instance_id` and `ip_address` are set once, when the create call
/// succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub machine_name: String,

    #[serde(default)]
    pub instance_id: Option<String>,

    #[serde(default)]
    pub ip_address: Option<String>,
}

impl Instance {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            ..Default::default()
        }
    }
}

/// Persistable driver state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpsieDriverConfig {
    pub options: DriverOptions,
    pub instance: Instance,
    pub ssh_key_path: PathBuf,
}

/// Credentials needed to finish a provisioned instance
///
/// Holds the one-time root password; it is never serialized.
pub struct PendingBootstrap {
    password: String,
    public_key: String,
}

impl std::fmt::Debug for PendingBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingBootstrap")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

pub struct VpsieDriver {
    options: DriverOptions,
    instance: Instance,
    ssh_key_path: PathBuf,
    api: Box<dyn VpsieApi>,
    shell: Box<dyn RemoteShell>,
}

impl VpsieDriver {
    /// Driver for a machine that does not exist yet
    pub fn new(
        machine_name: impl Into<String>,
        options: DriverOptions,
        ssh_key_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        Self::from_config(VpsieDriverConfig {
            options,
            instance: Instance::new(machine_name),
            ssh_key_path: ssh_key_path.into(),
        })
    }

    /// Driver for a previously saved machine
    pub fn from_config(config: VpsieDriverConfig) -> Result<Self> {
        let options = config.options.normalized();
        options.validate()?;

        let api = VpsieClient::new(&options.api_url, &options.client_id, &options.client_secret)?;
        Ok(Self::with_parts(
            VpsieDriverConfig { options, ..config },
            Box::new(api),
            Box::new(Ssh2Shell::new()),
        ))
    }

    /// Assemble a driver from explicit collaborators
    pub fn with_parts(
        config: VpsieDriverConfig,
        api: Box<dyn VpsieApi>,
        shell: Box<dyn RemoteShell>,
    ) -> Self {
        Self {
            options: config.options,
            instance: config.instance,
            ssh_key_path: config.ssh_key_path,
            api,
            shell,
        }
    }

    pub fn config(&self) -> VpsieDriverConfig {
        VpsieDriverConfig {
            options: self.options.clone(),
            instance: self.instance.clone(),
            ssh_key_path: self.ssh_key_path.clone(),
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn ssh_key_path(&self) -> &Path {
        &self.ssh_key_path
    }

    fn instance_id(&self) -> Result<&str> {
        self.instance
            .instance_id
            .as_deref()
            .ok_or(DriverError::NotCreated)
    }

    /// Generate the key, validate the catalog ids and create the instance.
    ///
    /// On success the instance id and address are set, so the caller can
    /// persist them before the long bootstrap wait starts. Nothing exists on
    /// VPSie when this fails.
    pub async fn provision(&mut self) -> Result<PendingBootstrap> {
        tracing::info!("Generating SSH key pair...");
        let key = SshKeyPair::ensure(&self.ssh_key_path).await?;

        tracing::info!("Validating image, datacenter and offer...");
        self.pre_create_check().await?;

        let params = self.options.provisioning_params(&self.instance.machine_name);
        tracing::info!("Creating VPSie instance {}...", params.hostname);
        let created = self
            .api
            .create_vpsie(&CreateVpsie {
                hostname: params.hostname,
                offer_id: params.offer_id,
                datacenter_id: params.datacenter_id,
                os_id: params.image_id,
            })
            .await?;

        tracing::info!(
            "Created VPSie instance {} ({})",
            created.id,
            created.ipv4.as_deref().unwrap_or("no address")
        );
        self.instance.instance_id = Some(created.id);
        self.instance.ip_address = created.ipv4;

        Ok(PendingBootstrap {
            password: created.password,
            public_key: key.public_key().to_string(),
        })
    }

    /// Wait for the provisioned instance and install the operator's key
    pub async fn bootstrap(&self, pending: PendingBootstrap) -> Result<BootstrapReport> {
        let target = SshTarget::new(
            self.get_ip()?,
            self.options.ssh_port,
            self.options.ssh_user.clone(),
        );
        let report = KeyInstaller::new(self, self.shell.as_ref(), self.options.wait)
            .install(&target, &pending.password, &pending.public_key)
            .await?;

        tracing::debug!(
            "Bootstrap finished after {} state polls and {} SSH polls",
            report.state_polls,
            report.ssh_polls
        );
        Ok(report)
    }

    async fn shutdown(&self, action: &str) -> Result<()> {
        let id = self.instance_id()?;
        tracing::info!("Shutting down VPSie instance {} ({})", id, action);

        let result = self.api.shutdown_vpsie(id).await?;
        if result.error {
            return Err(DriverError::ActionFailed {
                action: action.to_string(),
                code: result.error_code,
            });
        }
        Ok(())
    }
}

fn expect_status(action: &str, expected: &str, actual: String) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(DriverError::UnexpectedStatus {
            action: action.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

#[async_trait]
impl CatalogSource for VpsieDriver {
    async fn list_catalog(
        &self,
        kind: ResourceKind,
    ) -> std::result::Result<Vec<CatalogEntry>, String> {
        let entries = match kind {
            ResourceKind::Image => self.api.list_images().await,
            ResourceKind::Offer => self.api.list_offers().await,
            ResourceKind::Datacenter => self.api.list_datacenters().await,
        };
        entries.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl StateProbe for VpsieDriver {
    async fn current_state(&self) -> Result<LifecycleState> {
        self.get_state().await
    }
}

#[async_trait]
impl MachineDriver for VpsieDriver {
    fn driver_name(&self) -> &str {
        DRIVER_NAME
    }

    fn machine_name(&self) -> &str {
        &self.instance.machine_name
    }

    async fn pre_create_check(&self) -> Result<()> {
        let params = self.options.provisioning_params(&self.instance.machine_name);
        CatalogValidator::new(self).validate_all(&params).await
    }

    async fn create(&mut self) -> Result<()> {
        let pending = self.provision().await?;
        self.bootstrap(pending).await?;
        Ok(())
    }

    async fn get_state(&self) -> Result<LifecycleState> {
        let id = self.instance_id()?;
        let info = self.api.get_vpsie(id).await?;
        tracing::debug!("VPSie instance {} status: {}", id, info.status);
        Ok(lifecycle_state(&info.status))
    }

    fn get_ip(&self) -> Result<String> {
        match self.instance.ip_address.as_deref() {
            None | Some("") | Some("0") => Err(DriverError::IpNotSet),
            Some(ip) => Ok(ip.to_string()),
        }
    }

    async fn get_url(&self) -> Result<String> {
        if self.get_state().await? != LifecycleState::Running {
            return Err(DriverError::HostNotRunning);
        }
        let ip = self.get_ip()?;
        Ok(format!("tcp://{}:{}", ip, self.options.docker_port))
    }

    async fn start(&self) -> Result<()> {
        let id = self.instance_id()?;
        tracing::info!("Starting VPSie instance {}", id);
        let status = self.api.start_vpsie(id).await?;
        expect_status("start", STATUS_STARTED, status)
    }

    async fn stop(&self) -> Result<()> {
        self.shutdown("stop").await
    }

    async fn restart(&self) -> Result<()> {
        let id = self.instance_id()?;
        tracing::info!("Restarting VPSie instance {}", id);
        let status = self.api.restart_vpsie(id).await?;
        expect_status("restart", STATUS_RESTARTED, status)
    }

    /// Same provider call as [`MachineDriver::stop`]; VPSie exposes no
    /// forced power-off.
    async fn kill(&self) -> Result<()> {
        self.shutdown("kill").await
    }

    async fn remove(&self) -> Result<()> {
        let id = self.instance_id()?;
        tracing::info!("Deleting VPSie instance {}", id);
        let status = self.api.delete_vpsie(id).await?;
        expect_status("remove", STATUS_DELETED, status)
    }

    fn ssh_port(&self) -> u16 {
        self.options.ssh_port
    }

    fn ssh_username(&self) -> &str {
        &self.options.ssh_user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ActionStatus, CreatedVpsie, VpsieInfo};
    use crate::error::VpsieError;
    use machine_driver::{WaitConfig, WaitPhase};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeApi {
        calls: CallLog,
        datacenters: Vec<&'static str>,
        statuses: Mutex<VecDeque<&'static str>>,
        action_status: &'static str,
        shutdown: ActionStatus,
        ipv4: Option<&'static str>,
    }

    impl FakeApi {
        fn new(calls: CallLog) -> Self {
            Self {
                calls,
                datacenters: vec![crate::options::DEFAULT_DATACENTER_ID],
                statuses: Mutex::new(VecDeque::from(["Running"])),
                action_status: "Started",
                shutdown: ActionStatus::default(),
                ipv4: Some("203.0.113.10"),
            }
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl VpsieApi for FakeApi {
        async fn create_vpsie(&self, request: &CreateVpsie) -> crate::error::Result<CreatedVpsie> {
            self.record("create");
            Ok(CreatedVpsie {
                id: "vps-1".to_string(),
                hostname: Some(request.hostname.clone()),
                ipv4: self.ipv4.map(str::to_string),
                password: "one-time".to_string(),
            })
        }

        async fn get_vpsie(&self, id: &str) -> crate::error::Result<VpsieInfo> {
            self.record("get");
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().copied()
            };
            match status {
                Some(status) => Ok(VpsieInfo {
                    id: id.to_string(),
                    status: status.to_string(),
                    hostname: None,
                    ipv4: None,
                }),
                None => Err(VpsieError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }

        async fn start_vpsie(&self, _id: &str) -> crate::error::Result<String> {
            self.record("start");
            Ok(self.action_status.to_string())
        }

        async fn restart_vpsie(&self, _id: &str) -> crate::error::Result<String> {
            self.record("restart");
            Ok(self.action_status.to_string())
        }

        async fn shutdown_vpsie(&self, _id: &str) -> crate::error::Result<ActionStatus> {
            self.record("shutdown");
            Ok(self.shutdown.clone())
        }

        async fn delete_vpsie(&self, _id: &str) -> crate::error::Result<String> {
            self.record("delete");
            Ok(self.action_status.to_string())
        }

        async fn list_images(&self) -> crate::error::Result<Vec<CatalogEntry>> {
            self.record("images");
            Ok(vec![CatalogEntry::new(crate::options::DEFAULT_IMAGE_ID)])
        }

        async fn list_offers(&self) -> crate::error::Result<Vec<CatalogEntry>> {
            self.record("offers");
            Ok(vec![CatalogEntry::new(crate::options::DEFAULT_OFFER_ID)])
        }

        async fn list_datacenters(&self) -> crate::error::Result<Vec<CatalogEntry>> {
            self.record("datacenters");
            Ok(self.datacenters.iter().copied().map(CatalogEntry::new).collect())
        }
    }

    struct FakeShell {
        commands: CallLog,
        probe_failures: Mutex<u32>,
    }

    #[async_trait]
    impl RemoteShell for FakeShell {
        async fn run(&self, _target: &SshTarget, password: &str, command: &str) -> Result<String> {
            assert_eq!(password, "one-time");
            self.commands.lock().unwrap().push(command.to_string());
            let mut failures = self.probe_failures.lock().unwrap();
            if command == machine_driver::SSH_PROBE_COMMAND && *failures > 0 {
                *failures -= 1;
                return Err(DriverError::Access("connection refused".to_string()));
            }
            Ok(String::new())
        }
    }

    struct Harness {
        calls: CallLog,
        commands: CallLog,
        _dir: TempDir,
    }

    impl Harness {
        fn count(&self, call: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
        }
    }

    fn fast_options() -> DriverOptions {
        DriverOptions {
            wait: WaitConfig::new(Duration::from_millis(1), Duration::from_secs(5)),
            ..DriverOptions::new("id", "secret")
        }
    }

    fn driver_with(
        instance: Instance,
        options: DriverOptions,
        configure: impl FnOnce(&mut FakeApi),
        probe_failures: u32,
    ) -> (VpsieDriver, Harness) {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("id_rsa");
        std::fs::write(&key_path, "PRIVATE").unwrap();
        std::fs::write(dir.path().join("id_rsa.pub"), "ssh-rsa AAAA operator\n").unwrap();

        let calls = CallLog::default();
        let commands = CallLog::default();
        let mut api = FakeApi::new(calls.clone());
        configure(&mut api);
        let shell = FakeShell {
            commands: commands.clone(),
            probe_failures: Mutex::new(probe_failures),
        };

        let driver = VpsieDriver::with_parts(
            VpsieDriverConfig {
                options,
                instance,
                ssh_key_path: key_path,
            },
            Box::new(api),
            Box::new(shell),
        );
        (
            driver,
            Harness {
                calls,
                commands,
                _dir: dir,
            },
        )
    }

    fn created_instance(ip: &str) -> Instance {
        Instance {
            machine_name: "web-01".to_string(),
            instance_id: Some("vps-1".to_string()),
            ip_address: Some(ip.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_bootstraps_machine() {
        let (mut driver, harness) = driver_with(
            Instance::new("web-01"),
            fast_options(),
            |api| {
                api.statuses = Mutex::new(VecDeque::from(["Started", "Started", "Running"]));
            },
            2,
        );

        driver.create().await.unwrap();

        assert_eq!(harness.count("images"), 1);
        assert_eq!(harness.count("datacenters"), 1);
        assert_eq!(harness.count("offers"), 1);
        assert_eq!(harness.count("create"), 1);
        assert_eq!(harness.count("get"), 3);
        assert_eq!(driver.instance().instance_id.as_deref(), Some("vps-1"));
        assert_eq!(driver.get_ip().unwrap(), "203.0.113.10");

        let commands = harness.commands.lock().unwrap();
        assert_eq!(commands.len(), 4);
        let appends: Vec<_> = commands
            .iter()
            .filter(|c| c.contains("authorized_keys"))
            .collect();
        assert_eq!(appends.len(), 1);
        assert!(appends[0].contains("ssh-rsa AAAA operator"));
        drop(commands);

        assert_eq!(driver.get_state().await.unwrap(), LifecycleState::Running);
    }

    #[tokio::test]
    async fn test_provision_sets_identity_before_polling() {
        let (mut driver, harness) = driver_with(Instance::new("web-01"), fast_options(), |_| {}, 1);

        let pending = driver.provision().await.unwrap();

        assert_eq!(driver.config().instance.instance_id.as_deref(), Some("vps-1"));
        assert_eq!(driver.get_ip().unwrap(), "203.0.113.10");
        assert_eq!(harness.count("create"), 1);
        assert_eq!(harness.count("get"), 0);
        assert!(harness.commands.lock().unwrap().is_empty());
        assert!(!format!("{:?}", pending).contains("one-time"));

        let report = driver.bootstrap(pending).await.unwrap();
        assert_eq!(report.state_polls, 1);
        assert_eq!(report.ssh_polls, 2);
        assert_eq!(harness.commands.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_public_key_creates_nothing() {
        let (mut driver, harness) = driver_with(Instance::new("web-01"), fast_options(), |_| {}, 0);
        std::fs::write(driver.ssh_key_path().with_extension("pub"), "\n").unwrap();

        let err = driver.create().await.unwrap_err();

        assert!(matches!(err, DriverError::KeyGeneration(_)));
        assert!(harness.calls.lock().unwrap().is_empty());
        assert!(harness.commands.lock().unwrap().is_empty());
        assert!(driver.instance().instance_id.is_none());
    }

    #[tokio::test]
    async fn test_create_stops_on_unknown_datacenter() {
        let (mut driver, harness) = driver_with(
            Instance::new("web-01"),
            fast_options(),
            |api| api.datacenters = vec!["dc-other"],
            0,
        );

        let err = driver.create().await.unwrap_err();

        assert!(matches!(
            err,
            DriverError::InvalidResource { kind: ResourceKind::Datacenter, ref identifier }
                if identifier == crate::options::DEFAULT_DATACENTER_ID
        ));
        assert_eq!(harness.count("create"), 0);
        assert_eq!(harness.count("offers"), 0);
        assert!(driver.instance().instance_id.is_none());
    }

    #[tokio::test]
    async fn test_create_keeps_identity_when_bootstrap_times_out() {
        let options = DriverOptions {
            wait: WaitConfig::new(Duration::from_millis(1), Duration::from_millis(20)),
            ..DriverOptions::new("id", "secret")
        };
        let (mut driver, harness) = driver_with(
            Instance::new("web-01"),
            options,
            |api| api.statuses = Mutex::new(VecDeque::from(["Started"])),
            0,
        );

        let err = driver.create().await.unwrap_err();

        assert!(matches!(
            err,
            DriverError::BootstrapTimeout {
                phase: WaitPhase::VmRunning
            }
        ));
        assert_eq!(driver.instance().instance_id.as_deref(), Some("vps-1"));
        assert_eq!(
            driver.config().instance.ip_address.as_deref(),
            Some("203.0.113.10")
        );
        assert!(harness.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_address_fails_before_bootstrap() {
        let (mut driver, harness) =
            driver_with(Instance::new("web-01"), fast_options(), |api| api.ipv4 = None, 0);

        let err = driver.create().await.unwrap_err();

        assert!(matches!(err, DriverError::IpNotSet));
        assert_eq!(driver.instance().instance_id.as_deref(), Some("vps-1"));
        assert_eq!(harness.count("get"), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_requires_instance() {
        let (driver, harness) = driver_with(Instance::new("web-01"), fast_options(), |_| {}, 0);

        assert!(matches!(driver.start().await, Err(DriverError::NotCreated)));
        assert!(matches!(driver.stop().await, Err(DriverError::NotCreated)));
        assert!(matches!(driver.restart().await, Err(DriverError::NotCreated)));
        assert!(matches!(driver.kill().await, Err(DriverError::NotCreated)));
        assert!(matches!(driver.remove().await, Err(DriverError::NotCreated)));
        assert!(matches!(driver.get_state().await, Err(DriverError::NotCreated)));
        assert!(harness.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_matches_literal_status() {
        let (driver, _) = driver_with(created_instance("1.2.3.4"), fast_options(), |_| {}, 0);
        driver.start().await.unwrap();

        let (driver, _) = driver_with(
            created_instance("1.2.3.4"),
            fast_options(),
            |api| api.action_status = "Running",
            0,
        );
        let err = driver.start().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status Running after start (expected Started)"
        );
    }

    #[tokio::test]
    async fn test_restart_and_remove_literals() {
        let (driver, _) = driver_with(
            created_instance("1.2.3.4"),
            fast_options(),
            |api| api.action_status = "Restarted",
            0,
        );
        driver.restart().await.unwrap();
        assert!(matches!(
            driver.remove().await,
            Err(DriverError::UnexpectedStatus { ref action, .. }) if action == "remove"
        ));

        let (driver, harness) = driver_with(
            created_instance("1.2.3.4"),
            fast_options(),
            |api| api.action_status = "Deleted",
            0,
        );
        driver.remove().await.unwrap();
        assert_eq!(harness.count("delete"), 1);
    }

    #[tokio::test]
    async fn test_stop_and_kill_share_shutdown() {
        let (driver, harness) = driver_with(created_instance("1.2.3.4"), fast_options(), |_| {}, 0);
        driver.stop().await.unwrap();
        driver.kill().await.unwrap();
        assert_eq!(harness.count("shutdown"), 2);

        let (driver, _) = driver_with(
            created_instance("1.2.3.4"),
            fast_options(),
            |api| {
                api.shutdown = ActionStatus {
                    error: true,
                    error_code: "VPS_LOCKED".to_string(),
                }
            },
            0,
        );
        match driver.kill().await.unwrap_err() {
            DriverError::ActionFailed { action, code } => {
                assert_eq!(action, "kill");
                assert_eq!(code, "VPS_LOCKED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_ip_rejects_unset_addresses() {
        for ip in ["", "0"] {
            let (driver, _) = driver_with(created_instance(ip), fast_options(), |_| {}, 0);
            assert!(matches!(driver.get_ip(), Err(DriverError::IpNotSet)));
        }
        let (driver, _) = driver_with(Instance::new("web-01"), fast_options(), |_| {}, 0);
        assert!(matches!(driver.ssh_hostname(), Err(DriverError::IpNotSet)));

        let (driver, _) = driver_with(created_instance("203.0.113.7"), fast_options(), |_| {}, 0);
        assert_eq!(driver.get_ip().unwrap(), "203.0.113.7");
    }

    #[tokio::test]
    async fn test_get_url_only_when_running() {
        let (driver, _) = driver_with(created_instance("203.0.113.7"), fast_options(), |_| {}, 0);
        assert_eq!(driver.get_url().await.unwrap(), "tcp://203.0.113.7:2376");

        let (driver, _) = driver_with(
            created_instance("203.0.113.7"),
            fast_options(),
            |api| api.statuses = Mutex::new(VecDeque::from(["Stopped"])),
            0,
        );
        assert!(matches!(driver.get_url().await, Err(DriverError::HostNotRunning)));
    }

    #[tokio::test]
    async fn test_state_query_failure_carries_cause() {
        let (driver, _) = driver_with(
            created_instance("1.2.3.4"),
            fast_options(),
            |api| api.statuses = Mutex::new(VecDeque::new()),
            0,
        );
        let err = driver.get_state().await.unwrap_err();
        assert!(matches!(err, DriverError::ProviderRequest(ref msg) if msg.contains("503")));
    }

    #[test]
    fn test_config_round_trip() {
        let (driver, _) = driver_with(created_instance("1.2.3.4"), fast_options(), |_| {}, 0);
        assert_eq!(driver.driver_name(), "vpsie");
        assert_eq!(driver.ssh_username(), "root");
        assert_eq!(driver.ssh_port(), 22);

        let json = serde_json::to_value(driver.config()).unwrap();
        assert_eq!(json["instance"]["instance_id"], "vps-1");
        assert!(!json.to_string().contains("one-time"));

        let restored: VpsieDriverConfig = serde_json::from_value(json).unwrap();
        assert_eq!(restored, driver.config());
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = VpsieDriver::new("web-01", DriverOptions::new("", "secret"), "/tmp/id_rsa");
        assert!(matches!(
            result,
            Err(DriverError::MissingCredential { ref option }) if option == "--vpsie-client-id"
        ));
    }
}
