use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use snowmint::{DEFAULT_EPOCH, SnowmintId};

/// Runtime configuration for the `snowmint-server` binary.
///
/// In a Kubernetes deployment, `POD_NAME`, `NODE_NAME`, and `POD_UID` are
/// injected into the container by the StatefulSet; the pod name carries the
/// machine ID as its ordinal suffix. All values can also be supplied as CLI
/// flags for local runs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowmint-server",
    version,
    about = "An HTTP service issuing Snowflake-style unique IDs"
)]
pub struct CliArgs {
    /// Deployment-assigned pod name. The first run of digits in it becomes
    /// this instance's machine ID, which must be unique per deployment.
    ///
    /// Environment variable: `POD_NAME`
    #[arg(long, env = "POD_NAME", default_value_t = String::from("id-generator-1023"))]
    pub pod_name: String,

    /// Node this pod is scheduled on. Debugging only, reported by `/health`.
    ///
    /// Environment variable: `NODE_NAME`
    #[arg(long, env = "NODE_NAME")]
    pub node_name: Option<String>,

    /// Pod UID. Debugging only, reported by `/health`.
    ///
    /// Environment variable: `POD_UID`
    #[arg(long, env = "POD_UID")]
    pub pod_uid: Option<String>,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8000"))]
    pub server_addr: String,

    /// Epoch for the ID timestamp field, in milliseconds since the Unix
    /// epoch. Must be identical across every instance of a deployment and
    /// never changed once IDs have been issued.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub machine_id: u64,
    pub pod_name: String,
    pub node_name: Option<String>,
    pub pod_uid: Option<String>,
    pub server_addr: String,
    pub epoch: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let machine_id = extract_machine_id(&args.pod_name)?;

        Ok(Self {
            machine_id,
            pod_name: args.pod_name,
            node_name: args.node_name,
            pod_uid: args.pod_uid,
            server_addr: args.server_addr,
            epoch: Duration::from_millis(args.epoch_ms),
        })
    }
}

/// Extracts the machine ID from a pod name: the first contiguous run of
/// digits (e.g. `id-generator-42` -> 42).
///
/// Fails fast on names without digits or with an ordinal outside the 10-bit
/// machine field; serving with a bad machine ID risks colliding with another
/// instance's IDs.
fn extract_machine_id(pod_name: &str) -> anyhow::Result<u64> {
    let digits: String = pod_name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        bail!("Failed to find a numeric part in POD_NAME: {pod_name}");
    }

    let machine_id: u64 = digits
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid machine ID in POD_NAME {pod_name}: {e}"))?;

    if machine_id > SnowmintId::max_machine_id() {
        bail!(
            "Machine ID {} from POD_NAME {} exceeds the machine ID space (max = {})",
            machine_id,
            pod_name,
            SnowmintId::max_machine_id()
        );
    }

    Ok(machine_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_id_from_pod_ordinal() {
        assert_eq!(extract_machine_id("id-generator-0").unwrap(), 0);
        assert_eq!(extract_machine_id("id-generator-23").unwrap(), 23);
        assert_eq!(extract_machine_id("id-generator-1023").unwrap(), 1023);
    }

    #[test]
    fn machine_id_stops_at_first_digit_run() {
        // StatefulSet names can carry digits mid-name; only the first run
        // counts, matching the original deployment's extraction.
        assert_eq!(extract_machine_id("gen2-pod-7").unwrap(), 2);
    }

    #[test]
    fn pod_name_without_digits_is_rejected() {
        assert!(extract_machine_id("id-generator").is_err());
    }

    #[test]
    fn out_of_range_ordinal_is_rejected() {
        assert!(extract_machine_id("id-generator-1024").is_err());
    }
}
