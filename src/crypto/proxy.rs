//! Wallet proxy init code.
//!
//! Every wallet deploys from the same 40-byte template followed by one
//! 32-byte word holding the implementation address. The constructor part
//! of the template stores that word in the storage slot equal to the
//! proxy's own address, then returns the 26-byte delegation runtime that
//! forwards every call to the implementation.

use super::{keccak256, Address};

/// Version of the proxy template. Any edit to the bytes below changes
/// every future derived address and must bump this.
pub const PROXY_TEMPLATE_VERSION: u32 = 1;

/// Proxy creation code, without the trailing implementation word.
///
/// Hex: `603a600e3d39601a805130553df3363d3d373d3d3d363d30545af43d82803e903d91601857fd5bf3`
/// (14 bytes of constructor, 26 bytes of runtime).
pub const PROXY_CODE_TEMPLATE: [u8; 40] = [
    0x60, 0x3a, 0x60, 0x0e, 0x3d, 0x39, 0x60, 0x1a, 0x80, 0x51, 0x30, 0x55, 0x3d, 0xf3,
    0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d, 0x30, 0x54, 0x5a, 0xf4, 0x3d,
    0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x18, 0x57, 0xfd, 0x5b, 0xf3,
];

/// Init code length: the template plus one 32-byte word.
pub const INIT_CODE_LEN: usize = PROXY_CODE_TEMPLATE.len() + 32;

/// Builds the init code for a wallet backed by `implementation`.
///
/// The implementation address occupies the low-order 20 bytes of the
/// trailing word; bytes 40..52 stay zero.
pub fn init_code(implementation: Address) -> [u8; INIT_CODE_LEN] {
    let mut code = [0u8; INIT_CODE_LEN];
    code[..40].copy_from_slice(&PROXY_CODE_TEMPLATE);
    code[52..].copy_from_slice(implementation.as_bytes());
    code
}

/// Keccak-256 of the init code for `implementation`.
#[inline]
pub fn init_code_hash(implementation: Address) -> [u8; 32] {
    keccak256(&init_code(implementation))
}
