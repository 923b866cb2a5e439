#![allow(unused)]

/// Small xorshift PRNG used for transaction ids.
///
/// Not cryptographically secure. Seeded from the device clock and the
/// hardware address, so two devices powering up together still diverge.
#[derive(Debug)]
pub(crate) struct Rand {
    state: u64,
}

impl Rand {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn rand_u32(&mut self) -> u32 {
        // sPCG32 from https://www.pcg-random.org/paper.html
        // see also https://nullprogram.com/blog/2017/09/21/
        const M: u64 = 0xbb2efcec3c39611d;
        const A: u64 = 0x7590ef39;

        let s = self.state.wrapping_mul(M).wrapping_add(A);
        self.state = s;

        let shift = 29 - (s >> 61);
        (s >> shift) as u32
    }

    /// A 24-bit DHCPv6 transaction id.
    pub(crate) fn rand_xid(&mut self) -> u32 {
        self.rand_u32() & 0x00ff_ffff
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_xid_fits_24_bits() {
        let mut rand = Rand::new(0x0200_0000_0001);
        for _ in 0..64 {
            assert_eq!(rand.rand_xid() & !0x00ff_ffff, 0);
        }
    }

    #[test]
    fn test_distinct_seeds_diverge() {
        let mut a = Rand::new(1);
        let mut b = Rand::new(2);
        assert_ne!(a.rand_u32(), b.rand_u32());
    }
}
