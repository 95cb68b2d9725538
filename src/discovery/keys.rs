//! Registry Key Layout
//!
//! Role records live below a base key, one directory per role:
//!
//! ```text
//! <base>/master/<index>-<N>            -> master address
//! <base>/slave/<index>-<N>/<address>   -> slave address
//! ```
//!
//! Endpoint namespaces used for multicast are flat directories whose values are
//! endpoint URLs.

use crate::addresser::Role;
use crate::sharding::ShardDescriptor;

pub const MASTER_DIR: &str = "master";
pub const SLAVE_DIR: &str = "slave";

/// Joins a child segment onto a key, with exactly one `/` between them.
pub fn join(base: &str, child: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        child.trim_start_matches('/')
    )
}

pub fn role_dir(base: &str, role: Role) -> String {
    match role {
        Role::Master => join(base, MASTER_DIR),
        Role::Slave => join(base, SLAVE_DIR),
    }
}

pub fn master_key(base: &str, descriptor: &ShardDescriptor) -> String {
    join(&role_dir(base, Role::Master), &descriptor.to_string())
}

pub fn slave_key(base: &str, descriptor: &ShardDescriptor, address: &str) -> String {
    join(
        &join(&role_dir(base, Role::Slave), &descriptor.to_string()),
        address,
    )
}

/// Recovers the shard descriptor from a record key listed under `dir`.
///
/// Returns `None` for keys that do not follow the layout.
pub fn parse_record_key(dir: &str, key: &str) -> Option<ShardDescriptor> {
    let rest = key.strip_prefix(dir.trim_end_matches('/'))?;
    let rest = rest.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    segment.parse().ok()
}
