use std::io;

/// Pins the calling thread to a single logical CPU
///
/// Used so that reads are issued from a core of the package being measured.
pub fn pin_current_thread(cpu_id: usize) -> io::Result<()> {
	if cpu_id >= libc::CPU_SETSIZE as usize {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("CPU {cpu_id} is beyond the affinity mask size"),
		));
	}

	// SAFETY: the set is zero-initialised, `cpu_id` is within CPU_SETSIZE, and
	// the size passed matches the set type.
	let result = unsafe {
		let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
		libc::CPU_SET(cpu_id, &mut cpuset);

		let thread_id = libc::pthread_self();
		libc::pthread_setaffinity_np(thread_id, std::mem::size_of::<libc::cpu_set_t>(), &cpuset)
	};

	if result != 0 {
		return Err(io::Error::from_raw_os_error(result));
	}
	Ok(())
}

/// Returns true when running with an effective uid of 0
pub fn is_root() -> bool {
	// SAFETY: geteuid has no preconditions and cannot fail
	unsafe { libc::geteuid() == 0 }
}
