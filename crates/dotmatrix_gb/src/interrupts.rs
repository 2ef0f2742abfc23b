use bitflags::bitflags;

bitflags! {
    /// Request/enable bits as laid out in IF ($FF0F) and IE ($FFFF).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const INPUT = 1 << 4;
    }
}

/// Interrupt sources in priority order (VBlank highest, Input lowest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    Stat,
    Timer,
    Serial,
    /// Joypad line went low.
    Input,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::Stat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Input,
    ];

    #[inline]
    pub fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::Stat => InterruptFlags::STAT,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Input => InterruptFlags::INPUT,
        }
    }

    /// Service routine address: $40, $48, $50, $58, $60.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }
}

/// IE/IF state shared by the CPU and the interrupt producers.
///
/// IME is not stored here; it belongs to the CPU and is passed in where the
/// dispatch decision needs it.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    /// Raw IE byte. All 8 bits are readable/writable; only the low 5 matter.
    enable: u8,
    request: InterruptFlags,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request bit for `source`. Idempotent.
    #[inline]
    pub fn request(&mut self, source: Interrupt) {
        self.request.insert(source.flag());
    }

    /// Clear exactly the request bit for `source`.
    #[inline]
    pub fn acknowledge(&mut self, source: Interrupt) {
        self.request.remove(source.flag());
    }

    /// Requested sources that are also enabled in IE.
    #[inline]
    pub fn enabled_requests(&self) -> InterruptFlags {
        self.request & InterruptFlags::from_bits_truncate(self.enable)
    }

    /// True when IME is set and at least one enabled source is requested.
    #[inline]
    pub fn pending(&self, ime: bool) -> bool {
        ime && !self.enabled_requests().is_empty()
    }

    /// The single enabled+requested source with the highest priority.
    pub fn highest_priority(&self) -> Option<Interrupt> {
        let pending = self.enabled_requests();
        Interrupt::ALL
            .into_iter()
            .find(|source| pending.contains(source.flag()))
    }

    #[inline]
    pub fn requested(&self) -> InterruptFlags {
        self.request
    }

    /// IF as seen by the CPU; bits 7-5 always read as 1.
    #[inline]
    pub fn read_if(&self) -> u8 {
        self.request.bits() | 0xE0
    }

    #[inline]
    pub fn write_if(&mut self, value: u8) {
        self.request = InterruptFlags::from_bits_truncate(value);
    }

    #[inline]
    pub fn read_ie(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub fn write_ie(&mut self, value: u8) {
        self.enable = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_priority_follows_bit_order() {
        let mut ic = InterruptController::new();
        ic.write_ie(0x1F);
        ic.request(Interrupt::Input);
        ic.request(Interrupt::Timer);
        assert_eq!(ic.highest_priority(), Some(Interrupt::Timer));

        ic.request(Interrupt::VBlank);
        assert_eq!(ic.highest_priority(), Some(Interrupt::VBlank));

        ic.acknowledge(Interrupt::VBlank);
        assert_eq!(ic.highest_priority(), Some(Interrupt::Timer));
        assert_eq!(ic.read_if() & 0x1F, 0x14);
    }

    #[test]
    fn disabled_sources_are_never_selected() {
        let mut ic = InterruptController::new();
        ic.write_ie(InterruptFlags::STAT.bits());
        ic.request(Interrupt::VBlank);
        assert_eq!(ic.highest_priority(), None);
        assert!(!ic.pending(true));

        ic.request(Interrupt::Stat);
        assert_eq!(ic.highest_priority(), Some(Interrupt::Stat));
        assert!(ic.pending(true));
        assert!(!ic.pending(false));
    }

    #[test]
    fn requests_accumulate_until_acknowledged() {
        let mut ic = InterruptController::new();
        ic.request(Interrupt::Serial);
        ic.request(Interrupt::Serial);
        assert_eq!(ic.requested(), InterruptFlags::SERIAL);
        assert_eq!(ic.read_if(), 0xE8);

        ic.acknowledge(Interrupt::Serial);
        assert!(ic.requested().is_empty());
    }

    #[test]
    fn vectors_match_hardware() {
        let vectors: Vec<u16> = Interrupt::ALL.iter().map(|i| i.vector()).collect();
        assert_eq!(vectors, vec![0x40, 0x48, 0x50, 0x58, 0x60]);
    }
}
