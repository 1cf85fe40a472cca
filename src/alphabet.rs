//! Bisulfite base transforms over ASCII sequence buffers.

/// Which bisulfite conversion applies to a read or reference strand.
///
/// `CtoT` is the default bisulfite sense (unmethylated C read as T);
/// `GtoA` is its reverse-strand counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    CtoT,
    GtoA,
}

/// In-place C→T transform. `N` folds to `T` so ambiguity bases never
/// mismatch against the converted reference.
pub fn c_to_t(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        if *b == b'C' || *b == b'N' {
            *b = b'T';
        }
    }
}

/// In-place G→A transform. `N` folds to `A`.
pub fn g_to_a(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        if *b == b'G' || *b == b'N' {
            *b = b'A';
        }
    }
}

/// Converted copy of a read; the original is kept for output.
pub fn convert_read(org_read: &[u8], conversion: Conversion) -> Vec<u8> {
    let mut read = org_read.to_vec();
    match conversion {
        Conversion::CtoT => c_to_t(&mut read),
        Conversion::GtoA => g_to_a(&mut read),
    }
    read
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        _ => b'N',
    }
}
