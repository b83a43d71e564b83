//! Windows process access.
//!
//! Process discovery goes through a Toolhelp snapshot, the main-module base
//! address and executable path through a module snapshot, and the flag byte
//! through `ReadProcessMemory`/`WriteProcessMemory` on a handle opened with
//! the narrowest access rights that cover those calls.

use core::ffi::c_void;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_TIMEOUT};
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Module32FirstW, Process32FirstW, Process32NextW, MODULEENTRY32W,
    PROCESSENTRY32W, TH32CS_SNAPMODULE, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    OpenProcess, WaitForSingleObject, PROCESS_QUERY_INFORMATION, PROCESS_SYNCHRONIZE,
    PROCESS_VM_OPERATION, PROCESS_VM_READ, PROCESS_VM_WRITE,
};

use super::{GameProcess, ProcessCandidate, ProcessProvider};
use crate::error::{Error, Result};

/// Find the pid of a running process by executable name (no `.exe` suffix),
/// case-insensitively.
pub fn find_pid_by_name(process_name: &str) -> Result<Option<u32>> {
    // SAFETY: the snapshot handle is closed before returning on every path.
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
            .map_err(|e| Error::ProcessOpenFailed(format!("process snapshot failed: {e}")))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let exe = utf16_to_string(&entry.szExeFile);
                let lowered = exe.to_ascii_lowercase();
                let stem = lowered.strip_suffix(".exe").unwrap_or(&lowered);
                if stem.eq_ignore_ascii_case(process_name) {
                    found = Some(entry.th32ProcessID);
                    break;
                }
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);
        Ok(found)
    }
}

/// Base address and executable path of the main module of `pid`.
///
/// The first entry of a module snapshot is the process's own executable.
fn main_module(pid: u32) -> Result<(u64, String)> {
    // SAFETY: the snapshot handle is closed before returning on every path.
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPMODULE, pid).map_err(|e| {
            Error::ModuleResolveFailed(format!("module snapshot failed for pid {pid}: {e}"))
        })?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let result = Module32FirstW(snapshot, &mut entry)
            .map(|_| (entry.modBaseAddr as u64, utf16_to_string(&entry.szExePath)))
            .map_err(|e| {
                Error::ModuleResolveFailed(format!("no modules visible for pid {pid}: {e}"))
            });
        let _ = CloseHandle(snapshot);
        result
    }
}

fn utf16_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Four-part file version (`major.minor.build.private`) of an executable.
pub fn file_version(exe_path: &str) -> Result<String> {
    use windows::core::HSTRING;
    use windows::Win32::Storage::FileSystem::{
        GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW, VS_FIXEDFILEINFO,
    };

    let wide = HSTRING::from(exe_path);

    // SAFETY: standard two-call version-info sequence; the buffer outlives
    // the pointer VerQueryValueW hands back into it.
    unsafe {
        let size = GetFileVersionInfoSizeW(&wide, None);
        if size == 0 {
            return Err(Error::VersionQueryFailed(format!(
                "no version resource in {exe_path}"
            )));
        }

        let mut data = vec![0u8; size as usize];
        GetFileVersionInfoW(&wide, 0, size, data.as_mut_ptr().cast())
            .map_err(|e| Error::VersionQueryFailed(format!("{exe_path}: {e}")))?;

        let mut info: *mut VS_FIXEDFILEINFO = std::ptr::null_mut();
        let mut len = 0u32;
        let ok = VerQueryValueW(
            data.as_ptr().cast(),
            &HSTRING::from(r"\"),
            &mut info as *mut *mut VS_FIXEDFILEINFO as *mut *mut c_void,
            &mut len,
        );
        if !ok.as_bool()
            || info.is_null()
            || (len as usize) < std::mem::size_of::<VS_FIXEDFILEINFO>()
        {
            return Err(Error::VersionQueryFailed(format!(
                "no fixed file info in {exe_path}"
            )));
        }

        let info = &*info;
        if info.dwSignature != 0xFEEF04BD {
            return Err(Error::VersionQueryFailed(format!(
                "bad version signature in {exe_path}"
            )));
        }

        Ok(format!(
            "{}.{}.{}.{}",
            info.dwFileVersionMS >> 16,
            info.dwFileVersionMS & 0xFFFF,
            info.dwFileVersionLS >> 16,
            info.dwFileVersionLS & 0xFFFF
        ))
    }
}

/// An open process handle, closed on drop.
pub struct ProcessHandle {
    handle: HANDLE,
    pub pid: u32,
    pub base_address: u64,
    pub exe_path: String,
}

impl ProcessHandle {
    /// Open `pid` for memory access and resolve its main module.
    pub fn open(pid: u32) -> Result<Self> {
        // SAFETY: a successfully opened handle is owned by the returned value
        // and closed in Drop.
        let handle = unsafe {
            OpenProcess(
                PROCESS_QUERY_INFORMATION
                    | PROCESS_SYNCHRONIZE
                    | PROCESS_VM_READ
                    | PROCESS_VM_WRITE
                    | PROCESS_VM_OPERATION,
                false,
                pid,
            )
        }
        .map_err(|e| Error::ProcessOpenFailed(format!("OpenProcess failed for pid {pid}: {e}")))?;

        let (base_address, exe_path) = match main_module(pid) {
            Ok(resolved) => resolved,
            Err(e) => {
                // SAFETY: closing the handle we just opened.
                unsafe {
                    let _ = CloseHandle(handle);
                }
                return Err(e);
            }
        };

        debug!(
            "Opened process {} (base {:#x}, exe {})",
            pid, base_address, exe_path
        );

        Ok(Self {
            handle,
            pid,
            base_address,
            exe_path,
        })
    }
}

impl GameProcess for ProcessHandle {
    fn read_byte(&self, address: u64) -> Result<u8> {
        let mut buffer = [0u8; 1];
        let mut read = 0usize;
        // SAFETY: reading one byte into a stack buffer of size one.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const c_void,
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                Some(&mut read),
            )
        }
        .map_err(|e| Error::MemoryReadFailed {
            address,
            message: e.to_string(),
        })?;
        if read != buffer.len() {
            return Err(Error::MemoryReadFailed {
                address,
                message: "short read".to_string(),
            });
        }
        Ok(buffer[0])
    }

    fn write_byte(&self, address: u64, value: u8) -> Result<()> {
        let buffer = [value];
        let mut written = 0usize;
        // SAFETY: writing one byte from a stack buffer of size one.
        unsafe {
            WriteProcessMemory(
                self.handle,
                address as *const c_void,
                buffer.as_ptr().cast(),
                buffer.len(),
                Some(&mut written),
            )
        }
        .map_err(|e| Error::MemoryWriteFailed {
            address,
            message: e.to_string(),
        })?;
        if written != buffer.len() {
            return Err(Error::MemoryWriteFailed {
                address,
                message: "short write".to_string(),
            });
        }
        Ok(())
    }

    fn has_exited(&self) -> bool {
        // WAIT_TIMEOUT means the process object is unsignaled, i.e. running.
        // SAFETY: zero-timeout wait on a handle opened with PROCESS_SYNCHRONIZE.
        unsafe { WaitForSingleObject(self.handle, 0) != WAIT_TIMEOUT }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: closing the handle opened in ProcessHandle::open.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

/// [`ProcessProvider`] backed by the live OS process list.
pub struct WindowsProcessProvider;

impl ProcessProvider for WindowsProcessProvider {
    type Process = ProcessHandle;

    fn find_and_open(&self, process_name: &str) -> Result<Option<ProcessCandidate<ProcessHandle>>> {
        let Some(pid) = find_pid_by_name(process_name)? else {
            return Ok(None);
        };
        let process = ProcessHandle::open(pid)?;
        let file_version = file_version(&process.exe_path)?;
        Ok(Some(ProcessCandidate {
            pid,
            base_address: process.base_address,
            file_version,
            process,
        }))
    }
}
