//! C FFI bindings for the Mach host statistics calls.
//!
//! Constants and layouts follow `mach/processor_info.h`, `mach/host_info.h`
//! and `mach/machine.h`.

use std::mem;

use mach2::{
    kern_return::kern_return_t,
    message::mach_msg_type_number_t,
    port::mach_port_t,
    vm_types::{integer_t, natural_t, vm_address_t, vm_size_t},
};

#[expect(non_camel_case_types)]
pub type host_t = mach_port_t;

#[expect(non_camel_case_types)]
pub type processor_flavor_t = libc::c_int;

#[expect(non_camel_case_types)]
pub type host_flavor_t = integer_t;

#[expect(non_camel_case_types)]
pub type processor_info_array_t = *mut integer_t;

#[expect(non_camel_case_types)]
pub type host_info_t = *mut integer_t;

pub const PROCESSOR_CPU_LOAD_INFO: processor_flavor_t = 2;
pub const HOST_CPU_LOAD_INFO: host_flavor_t = 3;

pub const CPU_STATE_USER: usize = 0;
pub const CPU_STATE_SYSTEM: usize = 1;
pub const CPU_STATE_IDLE: usize = 2;
pub const CPU_STATE_NICE: usize = 3;
pub const CPU_STATE_MAX: usize = 4;

#[expect(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct host_cpu_load_info {
    pub cpu_ticks: [natural_t; CPU_STATE_MAX],
}

pub const HOST_CPU_LOAD_INFO_COUNT: mach_msg_type_number_t =
    (mem::size_of::<host_cpu_load_info>() / mem::size_of::<integer_t>()) as mach_msg_type_number_t;

// SAFETY: Bindings like this are inherently unsafe. See `mach/mach_host.h`
// for more details.
unsafe extern "C" {
    pub fn mach_host_self() -> host_t;

    pub fn host_processor_info(
        host: host_t, flavor: processor_flavor_t, out_processor_count: *mut natural_t,
        out_processor_info: *mut processor_info_array_t,
        out_processor_info_cnt: *mut mach_msg_type_number_t,
    ) -> kern_return_t;

    pub fn host_statistics(
        host_priv: host_t, flavor: host_flavor_t, host_info_out: host_info_t,
        host_info_out_cnt: *mut mach_msg_type_number_t,
    ) -> kern_return_t;

    pub fn vm_deallocate(
        target_task: mach_port_t, address: vm_address_t, size: vm_size_t,
    ) -> kern_return_t;

    pub fn mach_port_deallocate(task: mach_port_t, name: mach_port_t) -> kern_return_t;
}
