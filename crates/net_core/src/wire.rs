//! Wire encode/decode traits shared by commands and events.
//!
//! This stays simple on purpose; later phases can swap in better
//! encoders without breaking clients of these traits.

/// Types implementing wire encoding write themselves into a byte buffer.
pub trait WireEncode {
    fn encode(&self, out: &mut Vec<u8>);
}

/// Types implementing wire decoding reconstruct themselves from a byte slice.
pub trait WireDecode: Sized {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self>;
}

/// Consume `N` bytes from the front of `inp`.
pub(crate) fn take<const N: usize>(inp: &mut &[u8]) -> anyhow::Result<[u8; N]> {
    if inp.len() < N {
        anyhow::bail!("short read");
    }
    let (a, b) = inp.split_at(N);
    *inp = b;
    let mut buf = [0u8; N];
    buf.copy_from_slice(a);
    Ok(buf)
}

pub(crate) fn take_u8(inp: &mut &[u8]) -> anyhow::Result<u8> {
    Ok(take::<1>(inp)?[0])
}

pub(crate) fn take_u32(inp: &mut &[u8]) -> anyhow::Result<u32> {
    Ok(u32::from_le_bytes(take::<4>(inp)?))
}

pub(crate) fn take_u64(inp: &mut &[u8]) -> anyhow::Result<u64> {
    Ok(u64::from_le_bytes(take::<8>(inp)?))
}

pub(crate) fn take_i32(inp: &mut &[u8]) -> anyhow::Result<i32> {
    Ok(i32::from_le_bytes(take::<4>(inp)?))
}

pub(crate) fn take_f32(inp: &mut &[u8]) -> anyhow::Result<f32> {
    Ok(f32::from_le_bytes(take::<4>(inp)?))
}

pub(crate) fn take_f64(inp: &mut &[u8]) -> anyhow::Result<f64> {
    Ok(f64::from_le_bytes(take::<8>(inp)?))
}
