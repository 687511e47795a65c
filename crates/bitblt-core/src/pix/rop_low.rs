//! Low-level word engine for raster operations
//!
//! Everything in this module works in *bit* coordinates on rows of packed
//! 32-bit words; callers are responsible for clipping and for scaling
//! pixel coordinates by the depth. Rectangles arriving here are fully
//! inside both buffers and non-empty.
//!
//! Each row is processed in three phases: a leading partial word combined
//! under a mask, a run of full words combined wholesale, and a trailing
//! partial word combined under a mask. The full-word run carries no
//! masking or bounds branching; this is the inner loop that dominates
//! on large rectangles. The three alignment classes differ only in how
//! the destination-aligned source word is produced:
//!
//! - word-aligned: destination and source word streams line up directly
//! - vertically aligned: equal sub-word residues, so words still map
//!   one-to-one at a fixed word offset
//! - general: every destination word is assembled from the tail of one
//!   source word and the head of the next via a pair of shifts

/// Word combining function: (source word, destination word) -> new word.
pub(crate) type RopFn = fn(u32, u32) -> u32;

/// Destination-only combining function.
pub(crate) type UniFn = fn(u32) -> u32;

/// `LEFT_MASKS[n]` has the top (most significant) `n` bits set.
const LEFT_MASKS: [u32; 33] = {
    let mut m = [0u32; 33];
    let mut n = 1usize;
    while n <= 32 {
        m[n] = !0u32 << (32 - n as u32);
        n += 1;
    }
    m
};

/// `RIGHT_MASKS[n]` has the bottom (least significant) `n` bits set.
const RIGHT_MASKS: [u32; 33] = {
    let mut m = [0u32; 33];
    let mut n = 1usize;
    while n <= 32 {
        m[n] = !0u32 >> (32 - n as u32);
        n += 1;
    }
    m
};

/// Mask with the top `n` bits set, `n` in `[0, 32]`.
#[inline]
pub(crate) fn left_mask(n: u32) -> u32 {
    LEFT_MASKS[n as usize]
}

/// Mask with the bottom `n` bits set, `n` in `[0, 32]`.
#[inline]
pub(crate) fn right_mask(n: u32) -> u32 {
    RIGHT_MASKS[n as usize]
}

/// Produce a destination word that takes masked bits from `src` and
/// preserves the rest of `dst`.
#[inline]
pub(crate) fn combine(dst: u32, src: u32, mask: u32) -> u32 {
    (dst & !mask) | (src & mask)
}

/// Gather 32 bits from `row` starting at bit offset `bit` (MSB-first
/// numbering). Offsets may run past either end of the row; bits outside
/// the row read as zero. Used only for the edge words of the general
/// path, where the needed source span can poke past the row while the
/// out-of-range bits are masked away by the caller.
#[inline]
fn fetch32(row: &[u32], bit: isize) -> u32 {
    let wi = bit.div_euclid(32);
    let sh = bit.rem_euclid(32) as u32;
    let get = |i: isize| -> u32 {
        if i >= 0 && (i as usize) < row.len() {
            row[i as usize]
        } else {
            0
        }
    };
    if sh == 0 {
        get(wi)
    } else {
        (get(wi) << sh) | (get(wi + 1) >> (32 - sh))
    }
}

/// Geometry of one destination row span, in words.
struct Span {
    /// Index of the first destination word touched
    first: usize,
    /// Index of the last destination word touched
    last: usize,
    /// Mask for the first word (the bits at and past the span start)
    first_mask: u32,
    /// Mask for the last word (top `end_bits` bits)
    last_mask: u32,
}

impl Span {
    fn new(dx: usize, w: usize) -> Self {
        let first = dx >> 5;
        let last = (dx + w - 1) >> 5;
        let lead_bits = (dx & 31) as u32;
        let end_bits = ((dx + w - 1) & 31) as u32 + 1;
        Span {
            first,
            last,
            first_mask: right_mask(32 - lead_bits),
            last_mask: left_mask(end_bits),
        }
    }

    /// Mask for a span contained in a single word.
    #[inline]
    fn single_mask(&self) -> u32 {
        self.first_mask & self.last_mask
    }
}

/// General block combine, all coordinates in bits, pre-clipped.
///
/// `dst` and `src` must be distinct buffers; in-place shifts go through
/// [`shift_row_low`] and [`copy_band_row`] instead.
#[allow(clippy::too_many_arguments)]
pub(crate) fn rasterop_low(
    dst: &mut [u32],
    dwpl: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    op: RopFn,
    src: &[u32],
    swpl: usize,
    sx: usize,
    sy: usize,
) {
    debug_assert!(w > 0 && h > 0);
    if (dx & 31) == 0 && (sx & 31) == 0 {
        rop_word_aligned(dst, dwpl, dx, dy, w, h, op, src, swpl, sx, sy);
    } else if (dx & 31) == (sx & 31) {
        rop_vertically_aligned(dst, dwpl, dx, dy, w, h, op, src, swpl, sx, sy);
    } else {
        rop_general(dst, dwpl, dx, dy, w, h, op, src, swpl, sx, sy);
    }
}

/// Both spans start on a word boundary: words map one-to-one with no
/// shifting, and only the trailing word can be partial.
#[allow(clippy::too_many_arguments)]
fn rop_word_aligned(
    dst: &mut [u32],
    dwpl: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    op: RopFn,
    src: &[u32],
    swpl: usize,
    sx: usize,
    sy: usize,
) {
    let nfull = w >> 5;
    let tail_bits = (w & 31) as u32;
    let tail_mask = left_mask(tail_bits);
    let dword = dx >> 5;
    let sword = sx >> 5;

    for i in 0..h {
        let dbase = (dy + i) * dwpl + dword;
        let sbase = (sy + i) * swpl + sword;
        for k in 0..nfull {
            dst[dbase + k] = op(src[sbase + k], dst[dbase + k]);
        }
        if tail_bits > 0 {
            let d = dst[dbase + nfull];
            dst[dbase + nfull] = combine(d, op(src[sbase + nfull], d), tail_mask);
        }
    }
}

/// Equal nonzero residues: source words map one-to-one onto destination
/// words at a fixed offset, with masked first and last words.
#[allow(clippy::too_many_arguments)]
fn rop_vertically_aligned(
    dst: &mut [u32],
    dwpl: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    op: RopFn,
    src: &[u32],
    swpl: usize,
    sx: usize,
    sy: usize,
) {
    let span = Span::new(dx, w);
    // Residues are equal, so the word offset is exact.
    let woff = (sx as isize - dx as isize).div_euclid(32);

    for i in 0..h {
        let dbase = (dy + i) * dwpl;
        let sbase = ((sy + i) * swpl) as isize + woff;

        if span.first == span.last {
            let mask = span.single_mask();
            let sw = src[(sbase + span.first as isize) as usize];
            let d = dst[dbase + span.first];
            dst[dbase + span.first] = combine(d, op(sw, d), mask);
            continue;
        }

        let sw = src[(sbase + span.first as isize) as usize];
        let d = dst[dbase + span.first];
        dst[dbase + span.first] = combine(d, op(sw, d), span.first_mask);

        for j in span.first + 1..span.last {
            let sw = src[(sbase + j as isize) as usize];
            dst[dbase + j] = op(sw, dst[dbase + j]);
        }

        let sw = src[(sbase + span.last as isize) as usize];
        let d = dst[dbase + span.last];
        dst[dbase + span.last] = combine(d, op(sw, d), span.last_mask);
    }
}

/// Different residues: each destination word is assembled from two
/// adjacent source words, `(s0 << lshift) | (s1 >> 32 - lshift)`.
/// Interior fetches are in bounds by construction (the clipped source
/// span fits the row); the first and last words use the guarded fetch.
#[allow(clippy::too_many_arguments)]
fn rop_general(
    dst: &mut [u32],
    dwpl: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    op: RopFn,
    src: &[u32],
    swpl: usize,
    sx: usize,
    sy: usize,
) {
    let span = Span::new(dx, w);
    let delta = sx as isize - dx as isize;
    let lshift = delta.rem_euclid(32) as u32; // 1..=31 here
    let rshift = 32 - lshift;
    let woff = delta.div_euclid(32);
    // Source bit offset aligned with the first destination word.
    let first_bit = sx as isize + (span.first as isize * 32) - dx as isize;
    let last_bit = sx as isize + (span.last as isize * 32) - dx as isize;

    for i in 0..h {
        let srow = &src[(sy + i) * swpl..(sy + i) * swpl + swpl];
        let dbase = (dy + i) * dwpl;

        if span.first == span.last {
            let mask = span.single_mask();
            let sw = fetch32(srow, first_bit);
            let d = dst[dbase + span.first];
            dst[dbase + span.first] = combine(d, op(sw, d), mask);
            continue;
        }

        let sw = fetch32(srow, first_bit);
        let d = dst[dbase + span.first];
        dst[dbase + span.first] = combine(d, op(sw, d), span.first_mask);

        for j in span.first + 1..span.last {
            let si = (j as isize + woff) as usize;
            let sw = (srow[si] << lshift) | (srow[si + 1] >> rshift);
            dst[dbase + j] = op(sw, dst[dbase + j]);
        }

        let sw = fetch32(srow, last_bit);
        let d = dst[dbase + span.last];
        dst[dbase + span.last] = combine(d, op(sw, d), span.last_mask);
    }
}

/// Destination-only block combine, bit coordinates, pre-clipped.
///
/// One body covers both the word-aligned and the shifted case: when the
/// span starts on a word boundary the first mask is all-ones and the
/// masked write degenerates to a full write.
pub(crate) fn rasterop_uni_low(
    dst: &mut [u32],
    dwpl: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    op: UniFn,
) {
    debug_assert!(w > 0 && h > 0);
    let span = Span::new(dx, w);

    for i in 0..h {
        let dbase = (dy + i) * dwpl;

        if span.first == span.last {
            let mask = span.single_mask();
            let d = dst[dbase + span.first];
            dst[dbase + span.first] = combine(d, op(d), mask);
            continue;
        }

        let d = dst[dbase + span.first];
        dst[dbase + span.first] = combine(d, op(d), span.first_mask);

        for j in span.first + 1..span.last {
            dst[dbase + j] = op(dst[dbase + j]);
        }

        let d = dst[dbase + span.last];
        dst[dbase + span.last] = combine(d, op(d), span.last_mask);
    }
}

/// Copy the bit span `[xb, xb + wb)` of row `sy` onto row `dy` within a
/// single buffer. Reads happen before the corresponding writes, so the
/// rows may be in any order; the caller chooses the row iteration
/// direction that walks away from the overlap.
pub(crate) fn copy_band_row(
    data: &mut [u32],
    wpl: usize,
    xb: usize,
    wb: usize,
    sy: usize,
    dy: usize,
) {
    debug_assert!(wb > 0);
    let span = Span::new(xb, wb);
    let sbase = sy * wpl;
    let dbase = dy * wpl;

    if span.first == span.last {
        let mask = span.single_mask();
        let sw = data[sbase + span.first];
        data[dbase + span.first] = combine(data[dbase + span.first], sw, mask);
        return;
    }

    let sw = data[sbase + span.first];
    data[dbase + span.first] = combine(data[dbase + span.first], sw, span.first_mask);

    for j in span.first + 1..span.last {
        data[dbase + j] = data[sbase + j];
    }

    let sw = data[sbase + span.last];
    data[dbase + span.last] = combine(data[dbase + span.last], sw, span.last_mask);
}

/// Shift the first `row_bits` bits of a row horizontally by `shift` bits
/// (positive = toward higher x), in place. Vacated bits are zero-filled;
/// bits past `row_bits` (row padding) are left untouched. Words are
/// walked in the direction away from the overlap so every source word is
/// read before it is overwritten.
pub(crate) fn shift_row_low(row: &mut [u32], row_bits: usize, shift: isize) {
    if shift == 0 || row_bits == 0 {
        return;
    }
    let nwords = row_bits.div_ceil(32);
    let end_bits = ((row_bits - 1) & 31) as u32 + 1;
    let last_mask = left_mask(end_bits);
    let mag = shift.unsigned_abs();

    if mag >= row_bits {
        // Entire row vacated.
        rasterop_uni_low(row, nwords, 0, 0, row_bits, 1, |_| 0);
        return;
    }

    if shift > 0 {
        // Rightward: walk high to low. The source for word j sits at
        // lower indices, still unwritten.
        let sw = fetch32(row, (nwords - 1) as isize * 32 - shift);
        row[nwords - 1] = combine(row[nwords - 1], sw, last_mask);
        for j in (0..nwords - 1).rev() {
            row[j] = fetch32(row, j as isize * 32 - shift);
        }
        rasterop_uni_low(row, nwords, 0, 0, mag, 1, |_| 0);
    } else {
        // Leftward: walk low to high; sources sit at higher indices.
        for j in 0..nwords - 1 {
            row[j] = fetch32(row, j as isize * 32 + mag as isize);
        }
        let sw = fetch32(row, (nwords - 1) as isize * 32 + mag as isize);
        row[nwords - 1] = combine(row[nwords - 1], sw, last_mask);
        // Clears the vacated span, including any padding bits the
        // shift dragged in below row_bits.
        rasterop_uni_low(row, nwords, row_bits - mag, 0, mag, 1, |_| 0);
    }
}
