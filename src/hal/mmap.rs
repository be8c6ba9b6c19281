//! GPIO register block mapped from physical memory
//!
//! Opens the physical-memory device with synchronous (uncached) semantics and
//! maps the 4 KiB GPIO register window into the process. The mapping is
//! released exactly once: either through [`MappedRegisterBlock::close`] or,
//! on any other exit path, when the value is dropped.

use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr::{self, NonNull};

use super::regs::{RegisterBlock, BLOCK_SIZE, BLOCK_WORDS};
use crate::error::InitError;

/// Default physical-memory device
pub const DEFAULT_DEVICE: &str = "/dev/mem";

/// Owned mapping of the GPIO register window.
///
/// Neither `Clone` nor `Copy`: the mapping and the descriptor behind it have
/// a single owner, and releasing it consumes the value.
pub struct MappedRegisterBlock {
    base: NonNull<u32>,
    mapped: bool,
    /// Kept open for the lifetime of the mapping, closed on drop
    file: File,
    phys_addr: u64,
}

// The mapping is plain device memory; every access is a single volatile
// load or store, so sharing the pointer between threads is sound.
unsafe impl Send for MappedRegisterBlock {}
unsafe impl Sync for MappedRegisterBlock {}

impl MappedRegisterBlock {
    /// Map the register window at `phys_addr` from `device`.
    ///
    /// Fails with [`InitError::DeviceOpenFailed`] when the device cannot be
    /// opened and [`InitError::MapFailed`] when `mmap` rejects the request.
    /// Neither is retried.
    pub fn open(device: &Path, phys_addr: u64) -> Result<Self, InitError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|source| InitError::DeviceOpenFailed {
                path: device.to_path_buf(),
                source,
            })?;

        // On 32-bit targets the BCM2711 base does not fit a signed off_t;
        // the kernel reads the offset back as an unsigned page number.
        let offset = phys_addr as libc::off_t;

        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                BLOCK_SIZE,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };

        if addr == libc::MAP_FAILED {
            // `file` drops here and closes the descriptor
            return Err(InitError::MapFailed {
                addr: phys_addr,
                source: io::Error::last_os_error(),
            });
        }

        let base = NonNull::new(addr.cast::<u32>()).ok_or_else(|| InitError::MapFailed {
            addr: phys_addr,
            source: io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping"),
        })?;

        debug!(
            "Mapped {} bytes of GPIO registers at {:#010x} from {}",
            BLOCK_SIZE,
            phys_addr,
            device.display()
        );

        Ok(Self {
            base,
            mapped: true,
            file,
            phys_addr,
        })
    }

    /// Physical address of the mapped window
    pub fn phys_addr(&self) -> u64 {
        self.phys_addr
    }

    /// Unmap the window and close the device descriptor
    pub fn close(mut self) -> io::Result<()> {
        self.unmap()
        // descriptor closes when `self` drops here
    }

    fn unmap(&mut self) -> io::Result<()> {
        if !self.mapped {
            return Ok(());
        }
        self.mapped = false;

        let rc = unsafe { libc::munmap(self.base.as_ptr().cast(), BLOCK_SIZE) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        debug!(
            "Unmapped GPIO registers at {:#010x} (fd {})",
            self.phys_addr,
            self.file.as_raw_fd()
        );
        Ok(())
    }

    fn word_ptr(&self, word: usize) -> *mut u32 {
        assert!(word < BLOCK_WORDS, "register word {} outside GPIO window", word);
        // SAFETY: `word` is inside the mapped window, checked above
        unsafe { self.base.as_ptr().add(word) }
    }
}

impl RegisterBlock for MappedRegisterBlock {
    fn read(&self, word: usize) -> u32 {
        unsafe { ptr::read_volatile(self.word_ptr(word)) }
    }

    fn write(&self, word: usize, value: u32) {
        unsafe { ptr::write_volatile(self.word_ptr(word), value) }
    }
}

impl Drop for MappedRegisterBlock {
    fn drop(&mut self) {
        if let Err(e) = self.unmap() {
            warn!("munmap of GPIO registers failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn backing_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; BLOCK_SIZE]).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_device_reports_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-mem");

        match MappedRegisterBlock::open(&missing, 0x3F20_0000) {
            Err(InitError::DeviceOpenFailed { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opened a device that does not exist"),
        }
    }

    #[test]
    fn test_map_regular_file_round_trips_words() {
        // A regular file stands in for /dev/gpiomem: mapping at offset 0
        // exercises the same open/mmap/munmap path.
        let file = backing_file();

        let block = MappedRegisterBlock::open(file.path(), 0).unwrap();
        block.write(7, 0xDEAD_BEEF);
        assert_eq!(block.read(7), 0xDEAD_BEEF);
        assert_eq!(block.read(8), 0);
        block.close().unwrap();
    }

    #[test]
    #[should_panic(expected = "outside GPIO window")]
    fn test_out_of_window_access_panics() {
        let file = backing_file();

        let block = MappedRegisterBlock::open(file.path(), 0).unwrap();
        block.read(BLOCK_WORDS);
    }
}
