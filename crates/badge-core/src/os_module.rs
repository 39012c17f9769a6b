//! The `uos` module: platform identity, hardware randomness, flash mounts

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::args::Args;
use crate::error::{BadgeError, Errno};
use crate::hal::{MountConfig, MountHandle};
use crate::table::{Entry, Module, Session};
use crate::value::Value;

pub static UOS_MODULE: Module = Module {
    name: "uos",
    entries: &[
        Entry::str("__name__", "uos"),
        Entry::function("uname", os_uname, 0, 0),
        Entry::function("urandom", os_urandom, 1, 1),
        Entry::function("mount", os_mount, 2, 2),
        Entry::function("umount", os_umount, 1, 1),
    ],
};

pub const SYSNAME: &str = "esp32";
pub const BOARD_NAME: &str = "SHA2017 Badge";
pub const MCU_NAME: &str = "ESP32";

const UNAME_FIELDS: &[&str] = &["sysname", "nodename", "release", "version", "machine"];

const RELEASE: &str = env!("CARGO_PKG_VERSION");
const GIT_TAG: Option<&str> = option_env!("BADGE_GIT_TAG");
const BUILD_DATE: &str = match option_env!("BADGE_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// The `version` field: `"<git tag> on <build date>"`.
pub fn version_string() -> String {
    match GIT_TAG {
        Some(tag) => alloc::format!("{} on {}", tag, BUILD_DATE),
        None => alloc::format!("v{} on {}", RELEASE, BUILD_DATE),
    }
}

pub fn uname() -> Value {
    Value::AttrTuple {
        fields: UNAME_FIELDS,
        items: alloc::vec![
            Value::from(SYSNAME),
            Value::from(SYSNAME),
            Value::from(RELEASE),
            Value::from(version_string()),
            Value::Str(alloc::format!("{} with {}", BOARD_NAME, MCU_NAME)),
        ],
    }
}

fn os_uname(_: &mut Session<'_>, _: &Args<'_>) -> Result<Value, BadgeError> {
    Ok(uname())
}

fn os_urandom(session: &mut Session<'_>, args: &Args<'_>) -> Result<Value, BadgeError> {
    let count = args.int(0)?;
    let count = usize::try_from(count)
        .map_err(|_| BadgeError::Value(String::from("negative byte count")))?;
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(count).map_err(|_| {
        BadgeError::Memory(alloc::format!(
            "memory allocation failed, allocating {} bytes",
            count
        ))
    })?;
    let entropy = session.board.entropy();
    let mut word = 0u32;
    for idx in 0..count {
        if idx % 4 == 0 {
            word = entropy.next_u32();
        }
        bytes.push(word as u8);
        word >>= 8;
    }
    Ok(Value::Bytes(bytes))
}

fn os_mount(session: &mut Session<'_>, args: &Args<'_>) -> Result<Value, BadgeError> {
    let partition = args.str(0)?;
    let path = args.str(1)?;
    let config = MountConfig::default();
    match session.board.vfs().mount(partition, path, &config) {
        Ok(handle) => {
            log::info!("mounted {} at {}", partition, path);
            if let Some(previous) = session.mounts.insert(handle) {
                log::warn!("{} remounted, dropping handle {}", path, previous.raw());
            }
            Ok(Value::None)
        }
        Err(err) => {
            log::warn!("mount {} at {} failed: {}", partition, path, err);
            Err(BadgeError::Os(Errno::Einval))
        }
    }
}

fn os_umount(session: &mut Session<'_>, args: &Args<'_>) -> Result<Value, BadgeError> {
    let Some(path) = args.get(0).and_then(Value::as_str) else {
        return Err(BadgeError::Os(Errno::Einval));
    };
    let Some(handle) = session.mounts.take(path) else {
        fatal(format_args!("umount {}: nothing mounted there", path));
    };
    if let Err(err) = session.board.vfs().unmount(handle) {
        fatal(format_args!("umount {}: {}", path, err));
    }
    log::info!("unmounted {}", path);
    Ok(Value::None)
}

/// Unrecoverable failure: log and abort the program.
#[allow(clippy::panic)]
pub fn fatal(reason: fmt::Arguments<'_>) -> ! {
    log::error!("fatal: {}", reason);
    panic!("{}", reason);
}

/// Live mount handles keyed by mount point.
#[derive(Debug, Default)]
pub struct MountTable {
    handles: BTreeMap<String, MountHandle>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `handle`, returning the one it replaces.
    pub fn insert(&mut self, handle: MountHandle) -> Option<MountHandle> {
        self.handles.insert(String::from(handle.path()), handle)
    }

    pub fn take(&mut self, path: &str) -> Option<MountHandle> {
        self.handles.remove(path)
    }

    pub fn is_mounted(&self, path: &str) -> bool {
        self.handles.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }
}
