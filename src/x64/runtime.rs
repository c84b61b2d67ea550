//! Addresses of the primitives the native code calls.
//!
//! Generated code never links against anything; it loads these absolute
//! addresses into registers and calls through them. The signatures are the
//! C ones: `calloc(n, size)`, `free(ptr)`, `putchar(c)`, `getchar()`.

use libc::{c_int, c_void, size_t};

pub type AllocFn = unsafe extern "C" fn(size_t, size_t) -> *mut c_void;
pub type FreeFn = unsafe extern "C" fn(*mut c_void);
pub type PutCharFn = unsafe extern "C" fn(c_int) -> c_int;
pub type GetCharFn = unsafe extern "C" fn() -> c_int;

/// The four primitives a compiled program depends on.
#[derive(Debug, Clone, Copy)]
pub struct Runtime {
    pub alloc_zeroed: AllocFn,
    pub free: FreeFn,
    pub put_char: PutCharFn,
    pub get_char: GetCharFn,
}

impl Runtime {
    /// The host C library's `calloc`, `free`, `putchar` and `getchar`.
    pub fn host() -> Self {
        Self {
            alloc_zeroed: libc::calloc,
            free: libc::free,
            put_char: libc::putchar,
            get_char: libc::getchar,
        }
    }

    /// Keep the host allocator but route character I/O elsewhere.
    pub fn with_io(put_char: PutCharFn, get_char: GetCharFn) -> Self {
        Self {
            put_char,
            get_char,
            ..Self::host()
        }
    }

    pub fn alloc_zeroed_addr(&self) -> u64 {
        self.alloc_zeroed as usize as u64
    }

    pub fn free_addr(&self) -> u64 {
        self.free as usize as u64
    }

    pub fn put_char_addr(&self) -> u64 {
        self.put_char as usize as u64
    }

    pub fn get_char_addr(&self) -> u64 {
        self.get_char as usize as u64
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::host()
    }
}
