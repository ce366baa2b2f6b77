//! Fixtures shared by the rolling update tests.

use crate::cluster::{ClusterRole, RuntimePackage, RuntimeUpdate, Server, UpdateServer};
use crate::loc::Locator;

pub fn app() -> Locator {
    Locator::new("gravitational.io", "telekube", "7.0.0")
}

pub fn planet() -> Locator {
    Locator::new("gravitational.io", "planet", "7.0.35")
}

fn server(hostname: &str, cluster_role: ClusterRole) -> Server {
    Server {
        hostname: hostname.to_string(),
        advertise_ip: format!("10.0.0.{}", hostname.len()),
        role: cluster_role.to_string(),
        cluster_role,
    }
}

pub fn master(hostname: &str) -> Server {
    server(hostname, ClusterRole::Master)
}

pub fn worker(hostname: &str) -> Server {
    server(hostname, ClusterRole::Node)
}

fn with_update(server: Server) -> UpdateServer {
    let config = planet().sibling(format!("planet-config-{}", server.hostname), "7.0.35-op");
    UpdateServer {
        server,
        runtime: RuntimePackage {
            installed: planet(),
            secrets_package: None,
            update: Some(RuntimeUpdate {
                package: planet(),
                config_package: config,
            }),
        },
    }
}

pub fn update(hostname: &str) -> UpdateServer {
    with_update(master(hostname))
}

pub fn worker_update(hostname: &str) -> UpdateServer {
    with_update(worker(hostname))
}
