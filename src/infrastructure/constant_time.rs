use subtle::ConstantTimeEq;

/// Compare two secret byte strings without short-circuiting on the first
/// differing byte. Lengths are not secret (hash output sizes are public
/// parameters) so a length mismatch returns early.
pub fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}
