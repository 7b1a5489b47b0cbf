//! CPU tick counters from the Mach host interface.

mod bindings;

use std::{ffi::CStr, mem, ptr, slice};

use mach2::{
    kern_return::KERN_SUCCESS,
    message::mach_msg_type_number_t,
    traps::mach_task_self,
    vm_types::{integer_t, natural_t, vm_address_t, vm_size_t},
};

use self::bindings::*;
use super::{CoreCounters, CoreTopology, CounterSource, CounterWidth, TickCounters};
use crate::collection::error::{CollectionError, CollectionResult, QuerySite};

/// The per-core load array handed out by `host_processor_info`.
///
/// The kernel allocates the array in our address space; it is given back
/// with `vm_deallocate` when this is dropped, using the length the kernel
/// reported for this particular array.
#[derive(Debug)]
pub struct ProcessorLoadInfo {
    info: processor_info_array_t,
    len: mach_msg_type_number_t,
    cores: usize,
}

// SAFETY: The array is plain integers owned exclusively by this value, and
// `vm_deallocate` may be called from any thread of the task.
unsafe impl Send for ProcessorLoadInfo {}

impl ProcessorLoadInfo {
    fn as_slice(&self) -> &[integer_t] {
        if self.info.is_null() {
            return &[];
        }

        // SAFETY: The kernel guarantees `len` valid integers at `info`, which
        // stay mapped until we deallocate them in `drop`.
        unsafe { slice::from_raw_parts(self.info, self.len as usize) }
    }

    fn byte_len(&self) -> usize {
        self.len as usize * mem::size_of::<integer_t>()
    }
}

impl CoreCounters for ProcessorLoadInfo {
    fn core_count(&self) -> usize {
        self.cores.min(self.as_slice().len() / CPU_STATE_MAX)
    }

    fn core(&self, index: usize) -> Option<TickCounters> {
        if index >= self.core_count() {
            return None;
        }

        let start = index * CPU_STATE_MAX;
        let ticks = self.as_slice().get(start..start + CPU_STATE_MAX)?;

        // The kernel hands these out as `integer_t`, but they are unsigned
        // tick counts.
        let tick = |state: usize| u64::from(ticks[state] as u32);

        Some(TickCounters {
            user: tick(CPU_STATE_USER),
            system: tick(CPU_STATE_SYSTEM),
            nice: tick(CPU_STATE_NICE),
            idle: tick(CPU_STATE_IDLE),
        })
    }
}

impl Drop for ProcessorLoadInfo {
    fn drop(&mut self) {
        if self.info.is_null() {
            return;
        }

        // SAFETY: `info` came from `host_processor_info` and has not been
        // deallocated yet; this is the only place that does so.
        let result = unsafe {
            vm_deallocate(
                mach_task_self(),
                self.info as vm_address_t,
                self.byte_len() as vm_size_t,
            )
        };

        if result != KERN_SUCCESS {
            log::error!("vm_deallocate of cpu load info failed, error code {result}");
        }
    }
}

/// Reads counters through `host_processor_info` and `host_statistics`.
#[derive(Debug)]
pub struct MachSource {
    host: host_t,
}

impl Default for MachSource {
    fn default() -> Self {
        // SAFETY: Always succeeds and returns a send right to the host port.
        let host = unsafe { mach_host_self() };
        Self { host }
    }
}

impl MachSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for MachSource {
    fn drop(&mut self) {
        // SAFETY: We own the send right obtained in `default`.
        unsafe {
            mach_port_deallocate(mach_task_self(), self.host);
        }
    }
}

impl CounterSource for MachSource {
    type Buffer = ProcessorLoadInfo;

    /// Mach reports ticks as 32-bit counters, which wrap.
    const WIDTH: CounterWidth = CounterWidth::U32;

    fn per_core(&self) -> CollectionResult<ProcessorLoadInfo> {
        let mut cores: natural_t = 0;
        let mut info: processor_info_array_t = ptr::null_mut();
        let mut len: mach_msg_type_number_t = 0;

        // SAFETY: All out-pointers are valid for writes. The array is only
        // wrapped (and so only ever deallocated) on success.
        let result = unsafe {
            host_processor_info(
                self.host,
                PROCESSOR_CPU_LOAD_INFO,
                &mut cores,
                &mut info,
                &mut len,
            )
        };

        if result != KERN_SUCCESS {
            return Err(CollectionError::kernel(QuerySite::PerCore, result));
        }

        Ok(ProcessorLoadInfo {
            info,
            len,
            cores: cores as usize,
        })
    }

    fn aggregate(&self) -> CollectionResult<TickCounters> {
        let mut load = host_cpu_load_info::default();
        let mut count = HOST_CPU_LOAD_INFO_COUNT;

        // SAFETY: `load` is a `#[repr(C)]` struct of exactly `count` integers.
        let result = unsafe {
            host_statistics(
                self.host,
                HOST_CPU_LOAD_INFO,
                (&mut load as *mut host_cpu_load_info).cast(),
                &mut count,
            )
        };

        if result != KERN_SUCCESS {
            return Err(CollectionError::kernel(QuerySite::Aggregate, result));
        }

        let ticks = load.cpu_ticks;

        Ok(TickCounters {
            user: u64::from(ticks[CPU_STATE_USER]),
            system: u64::from(ticks[CPU_STATE_SYSTEM]),
            nice: u64::from(ticks[CPU_STATE_NICE]),
            idle: u64::from(ticks[CPU_STATE_IDLE]),
        })
    }

    fn topology(&self) -> CollectionResult<CoreTopology> {
        Ok(CoreTopology {
            physical: sysctl_count(c"hw.physicalcpu")?,
            logical: sysctl_count(c"hw.logicalcpu")?,
        })
    }
}

/// Reads an integer sysctl by name.
fn sysctl_count(name: &CStr) -> CollectionResult<usize> {
    let mut value: libc::c_int = 0;
    let mut size = mem::size_of::<libc::c_int>();

    // SAFETY: `value` and `size` are valid for writes and `size` matches the
    // buffer we pass.
    let result = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            (&mut value as *mut libc::c_int).cast(),
            &mut size,
            ptr::null_mut(),
            0,
        )
    };

    if result != 0 {
        let code = std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(result);
        return Err(CollectionError::kernel(QuerySite::Topology, code));
    }

    usize::try_from(value)
        .map_err(|_| CollectionError::malformed(format!("negative value for {name:?}")))
}
