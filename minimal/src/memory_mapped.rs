use core::ptr::addr_of_mut;

pub struct MemoryMapped<T> {
    address: *mut T,
}

impl<T> MemoryMapped<T> {
    /// # Safety
    /// `address` must be valid for volatile reads and writes of `T` for as
    /// long as this value is used.
    pub const unsafe fn new(address: usize) -> Self {
        MemoryMapped {
            address: address as *mut T,
        }
    }

    pub fn get(&self) -> T {
        unsafe { self.address.read_volatile() }
    }

    pub fn set(&self, val: T) {
        if core::mem::size_of::<T>() != 0 {
            unsafe { self.address.write_volatile(val) }
        }
    }
}

pub struct MemoryMapped1DArray<T, const N: usize> {
    array: *mut [T; N],
}

#[allow(dead_code)]
impl<T, const N: usize> MemoryMapped1DArray<T, N> {
    /// # Safety
    /// `address` must point to `N` consecutive `T`s valid for volatile access.
    pub const unsafe fn new(address: usize) -> Self {
        MemoryMapped1DArray {
            array: address as *mut [T; N],
        }
    }

    pub fn get(&self, n: usize) -> T {
        unsafe { addr_of_mut!((*self.array)[n]).read_volatile() }
    }

    pub fn set(&self, n: usize, val: T) {
        unsafe { addr_of_mut!((*self.array)[n]).write_volatile(val) }
    }
}

/// A row major `X` by `Y` grid of memory mapped values.
pub struct MemoryMapped2DArray<T, const X: usize, const Y: usize> {
    array: *mut [[T; X]; Y],
}

impl<T, const X: usize, const Y: usize> MemoryMapped2DArray<T, X, Y> {
    /// # Safety
    /// `address` must point to `X * Y` consecutive `T`s valid for volatile
    /// access.
    pub const unsafe fn new(address: usize) -> Self {
        MemoryMapped2DArray {
            array: address as *mut [[T; X]; Y],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> T {
        unsafe { addr_of_mut!((*self.array)[y][x]).read_volatile() }
    }

    pub fn set(&self, x: usize, y: usize, val: T) {
        unsafe { addr_of_mut!((*self.array)[y][x]).write_volatile(val) }
    }
}
