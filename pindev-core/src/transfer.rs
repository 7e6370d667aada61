//! Short-transfer arithmetic
//!
//! A device read or write moves `min(requested, available)` bytes and
//! reports that count minus whatever the user copy could not move.

use pindev_hal::{UserReader, UserWriter};

/// Copy as much of `src` as the caller asked for into user space
///
/// Returns the number of bytes actually transferred.
pub fn copy_out<W: UserWriter + ?Sized>(out: &mut W, src: &[u8]) -> usize {
    let to_copy = out.len().min(src.len());
    let not_copied = out.copy_to_user(&src[..to_copy]);
    to_copy.saturating_sub(not_copied)
}

/// Copy as much of the user payload as fits into `dst`
///
/// Returns the number of bytes actually transferred; they occupy the
/// start of `dst`.
pub fn copy_in<R: UserReader + ?Sized>(input: &mut R, dst: &mut [u8]) -> usize {
    let to_copy = input.len().min(dst.len());
    let not_copied = input.copy_from_user(&mut dst[..to_copy]);
    to_copy.saturating_sub(not_copied)
}
