//! Bounds-checked guest linear memory read/write helpers.
//!
//! All functions validate the pointer and element count against the memory
//! size before touching it. Out-of-bounds access returns
//! `HostError::OutOfBounds` naming the offending range — never a silent
//! clamp or truncation. Multi-byte elements use little-endian byte order,
//! matching WASM linear memory.
//!
//! Callers pass a slice freshly derived from the guest instance; views are
//! never held across calls because the backing buffer may move on growth.

use gangway_hostapi::HostError;

/// Validate that `byte_len` bytes starting at `ptr` lie within memory of
/// `mem_size` bytes.
pub fn validate_range(mem_size: usize, ptr: u32, byte_len: u64) -> Result<(), HostError> {
    let end = ptr as u64 + byte_len;
    if end > mem_size as u64 {
        return Err(HostError::OutOfBounds {
            ptr,
            len: byte_len,
            size: mem_size,
        });
    }
    Ok(())
}

/// Read `len` bytes from guest memory at `ptr`.
pub fn read_bytes(mem: &[u8], ptr: u32, len: u32) -> Result<Vec<u8>, HostError> {
    validate_range(mem.len(), ptr, len as u64)?;
    let start = ptr as usize;
    Ok(mem[start..start + len as usize].to_vec())
}

/// Write `data` bytes to guest memory at `ptr`.
pub fn write_bytes(mem: &mut [u8], ptr: u32, data: &[u8]) -> Result<(), HostError> {
    validate_range(mem.len(), ptr, data.len() as u64)?;
    let start = ptr as usize;
    mem[start..start + data.len()].copy_from_slice(data);
    Ok(())
}

/// Read `count` 16-bit elements from guest memory at `ptr`.
pub fn read_u16s(mem: &[u8], ptr: u32, count: u32) -> Result<Vec<u16>, HostError> {
    validate_range(mem.len(), ptr, count as u64 * 2)?;
    let start = ptr as usize;
    Ok(mem[start..start + count as usize * 2]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect())
}

/// Write 16-bit elements to guest memory at `ptr`.
pub fn write_u16s(mem: &mut [u8], ptr: u32, data: &[u16]) -> Result<(), HostError> {
    validate_range(mem.len(), ptr, data.len() as u64 * 2)?;
    let start = ptr as usize;
    for (i, unit) in data.iter().enumerate() {
        mem[start + i * 2..start + i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    Ok(())
}

/// Read `count` 32-bit elements from guest memory at `ptr`.
pub fn read_u32s(mem: &[u8], ptr: u32, count: u32) -> Result<Vec<u32>, HostError> {
    validate_range(mem.len(), ptr, count as u64 * 4)?;
    let start = ptr as usize;
    Ok(mem[start..start + count as usize * 4]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Write 32-bit elements to guest memory at `ptr`.
pub fn write_u32s(mem: &mut [u8], ptr: u32, data: &[u32]) -> Result<(), HostError> {
    validate_range(mem.len(), ptr, data.len() as u64 * 4)?;
    let start = ptr as usize;
    for (i, word) in data.iter().enumerate() {
        mem[start + i * 4..start + i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    Ok(())
}
