//! FAT filesystem on a wear-levelled SPI flash partition

use std::ffi::CString;

use badge_core::hal::{FlashVfs, MountConfig, MountHandle};
use badge_core::HalError;
use esp_idf_svc::sys;

pub struct EspFlashVfs;

impl EspFlashVfs {
    pub fn new() -> Self {
        Self
    }
}

fn c_string(what: &str, value: &str) -> Result<CString, HalError> {
    CString::new(value)
        .map_err(|_| HalError::new(sys::ESP_ERR_INVALID_ARG as i32, format!("{} contains NUL", what)))
}

impl FlashVfs for EspFlashVfs {
    fn mount(
        &mut self,
        partition: &str,
        path: &str,
        config: &MountConfig,
    ) -> Result<MountHandle, HalError> {
        let c_path = c_string("mount point", path)?;
        let c_label = c_string("partition label", partition)?;
        let mount_config = sys::esp_vfs_fat_mount_config_t {
            format_if_mount_failed: config.format_if_mount_failed,
            max_files: config.max_files as i32,
            allocation_unit_size: 0,
            disk_status_check_enable: false,
            use_one_fat: false,
        };
        let mut wl_handle: sys::wl_handle_t = sys::WL_INVALID_HANDLE;

        let res = unsafe {
            sys::esp_vfs_fat_spiflash_mount_rw_wl(
                c_path.as_ptr(),
                c_label.as_ptr(),
                &mount_config,
                &mut wl_handle,
            )
        };
        if res != sys::ESP_OK {
            return Err(HalError::new(res, format!("spiflash mount of {} failed", partition)));
        }

        log::info!("FAT partition {} mounted at {} (wl handle {})", partition, path, wl_handle);
        Ok(MountHandle::new(wl_handle, path))
    }

    fn unmount(&mut self, handle: MountHandle) -> Result<(), HalError> {
        let c_path = c_string("mount point", handle.path())?;
        let res = unsafe { sys::esp_vfs_fat_spiflash_unmount_rw_wl(c_path.as_ptr(), handle.raw()) };
        if res != sys::ESP_OK {
            return Err(HalError::new(res, format!("spiflash unmount of {} failed", handle.path())));
        }
        Ok(())
    }
}
