//! Bundled RV32E interpreter.
//!
//! A compact base-integer interpreter that plays two roles in the harness:
//! 1. **Demo core:** Implements [`Core`] so the shipped binary has a device
//!    under test to drive.
//! 2. **Reference model:** Implements [`RefModel`] as the default in-process
//!    reference the oracle runs in lockstep.
//!
//! The instruction subset is deliberately small: RV32E base integer
//! (LUI/AUIPC/JAL/JALR, branches, byte/half/word loads and stores, OP-IMM
//! and OP ALU groups), `csrrw`/`csrrs`, `ecall`/`mret` trap entry and
//! return, `fence` as a no-op, and `ebreak` as the end-of-simulation trap
//! with the exit code taken from `a0`. Anything else retires as a fatal
//! illegal-instruction error. Full ISA semantics are out of scope.

use std::io;

use crate::arch::Context;
use crate::arch::csr::CsrFile;
use crate::arch::reg::RegisterFile;
use crate::common::error::SimError;
use crate::common::status::{SimStatus, StatusHandle};
use crate::config::Config;
use crate::difftest::{Direction, RefModel};
use crate::sim::executor::{Commit, Core};
use crate::soc::AddressSpace;
use crate::soc::bus::WMASK_ALL;
use crate::soc::devices::{Clock, Serial};

/// Opcode field mask.
const OPCODE_MASK: u32 = 0x7f;

/// `mcause` value for an environment call from M-mode.
const CAUSE_MACHINE_ECALL: u32 = 11;

/// Interrupt bit of `mcause`.
const CAUSE_INTERRUPT: u32 = 0x8000_0000;

/// Exit-code register (`a0`).
const REG_A0: usize = 10;

fn imm_i(inst: u32) -> u32 {
    ((inst as i32) >> 20) as u32
}

fn imm_s(inst: u32) -> u32 {
    ((((inst & 0xfe00_0000) as i32) >> 20) as u32) | ((inst >> 7) & 0x1f)
}

fn imm_b(inst: u32) -> u32 {
    ((((inst & 0x8000_0000) as i32) >> 19) as u32)
        | ((inst & 0x0000_0080) << 4)
        | ((inst >> 20) & 0x7e0)
        | ((inst >> 7) & 0x1e)
}

fn imm_u(inst: u32) -> u32 {
    inst & 0xffff_f000
}

fn imm_j(inst: u32) -> u32 {
    ((((inst & 0x8000_0000) as i32) >> 11) as u32)
        | (inst & 0x000f_f000)
        | ((inst >> 9) & 0x800)
        | ((inst >> 20) & 0x7fe)
}

/// RV32E base-integer interpreter.
#[derive(Debug)]
pub struct Interpreter {
    regs: RegisterFile,
    pc: u32,
    csr: CsrFile,
    bus: AddressSpace,
    status: StatusHandle,
}

impl Interpreter {
    /// Creates an interpreter wired to the shared status handle, with the
    /// serial device on stdout. This is the demo device under test.
    pub fn new(config: &Config, status: StatusHandle) -> Self {
        let bus = AddressSpace::new(&config.system, status.clone());
        Self::with_bus(config, status, bus)
    }

    /// Creates an interpreter for reference-model duty: its own status
    /// handle and a silenced serial sink, so device output is not printed
    /// twice.
    pub fn reference(config: &Config) -> Self {
        let status = StatusHandle::new();
        let bus = AddressSpace::with_devices(
            &config.system,
            status.clone(),
            Clock::new(),
            Serial::with_sink(Box::new(io::sink())),
        );
        Self::with_bus(config, status, bus)
    }

    /// Creates an interpreter over a pre-built address space (tests inject
    /// clocks and capture sinks this way).
    pub fn with_bus(config: &Config, status: StatusHandle, bus: AddressSpace) -> Self {
        Self {
            regs: RegisterFile::new(config.arch.gpr_count),
            pc: config.arch.reset_vector,
            csr: CsrFile::new(),
            bus,
            status,
        }
    }

    /// Loads a boot image at the RAM window base.
    pub fn load_image(&mut self, data: &[u8]) {
        self.bus.load_image(data);
    }

    fn gpr(&self, idx: usize, pc: u32, inst: u32) -> Result<u32, SimError> {
        if idx < self.regs.len() {
            Ok(self.regs.read(idx))
        } else {
            Err(SimError::IllegalInstruction { pc, inst })
        }
    }

    fn set_gpr(&mut self, idx: usize, value: u32, pc: u32, inst: u32) -> Result<(), SimError> {
        if idx < self.regs.len() {
            self.regs.write(idx, value);
            Ok(())
        } else {
            Err(SimError::IllegalInstruction { pc, inst })
        }
    }

    /// Trap entry: records `pc` and `cause`, returns the handler address.
    fn trap(&mut self, pc: u32, cause: u32) -> u32 {
        self.csr.mepc = pc;
        self.csr.mcause = cause;
        self.csr.mtvec
    }

    /// Executes one decoded instruction and advances the program counter.
    fn execute(&mut self, pc: u32, inst: u32) -> Result<(), SimError> {
        let rd = ((inst >> 7) & 0x1f) as usize;
        let rs1 = ((inst >> 15) & 0x1f) as usize;
        let rs2 = ((inst >> 20) & 0x1f) as usize;
        let funct3 = (inst >> 12) & 0x7;
        let funct7 = inst >> 25;
        let mut next = pc.wrapping_add(4);

        match inst & OPCODE_MASK {
            // lui
            0x37 => self.set_gpr(rd, imm_u(inst), pc, inst)?,
            // auipc
            0x17 => self.set_gpr(rd, pc.wrapping_add(imm_u(inst)), pc, inst)?,
            // jal
            0x6f => {
                self.set_gpr(rd, next, pc, inst)?;
                next = pc.wrapping_add(imm_j(inst));
            }
            // jalr
            0x67 => {
                let target = self.gpr(rs1, pc, inst)?.wrapping_add(imm_i(inst)) & !1;
                self.set_gpr(rd, next, pc, inst)?;
                next = target;
            }
            // branches
            0x63 => {
                let a = self.gpr(rs1, pc, inst)?;
                let b = self.gpr(rs2, pc, inst)?;
                let taken = match funct3 {
                    0x0 => a == b,
                    0x1 => a != b,
                    0x4 => (a as i32) < (b as i32),
                    0x5 => (a as i32) >= (b as i32),
                    0x6 => a < b,
                    0x7 => a >= b,
                    _ => return Err(SimError::IllegalInstruction { pc, inst }),
                };
                if taken {
                    next = pc.wrapping_add(imm_b(inst));
                }
            }
            // loads
            0x03 => {
                let addr = self.gpr(rs1, pc, inst)?.wrapping_add(imm_i(inst));
                let word = self.bus.read_word(addr)?;
                let shift = (addr & 0x3) * 8;
                let value = match funct3 {
                    0x0 => ((word >> shift) as u8) as i8 as i32 as u32,
                    0x1 => ((word >> shift) as u16) as i16 as i32 as u32,
                    0x2 => word,
                    0x4 => (word >> shift) & 0xff,
                    0x5 => (word >> shift) & 0xffff,
                    _ => return Err(SimError::IllegalInstruction { pc, inst }),
                };
                self.set_gpr(rd, value, pc, inst)?;
            }
            // stores
            0x23 => {
                let addr = self.gpr(rs1, pc, inst)?.wrapping_add(imm_s(inst));
                let value = self.gpr(rs2, pc, inst)?;
                let shift = (addr & 0x3) * 8;
                let (data, wmask) = match funct3 {
                    0x0 => (value << shift, 0b0001_u8 << (addr & 0x3)),
                    0x1 => (value << shift, 0b0011_u8 << (addr & 0x3)),
                    0x2 => (value, WMASK_ALL),
                    _ => return Err(SimError::IllegalInstruction { pc, inst }),
                };
                self.bus.write_word(addr, data, wmask)?;
            }
            // op-imm
            0x13 => {
                let a = self.gpr(rs1, pc, inst)?;
                let imm = imm_i(inst);
                let shamt = imm & 0x1f;
                let value = match funct3 {
                    0x0 => a.wrapping_add(imm),
                    0x1 if funct7 == 0x00 => a << shamt,
                    0x2 => u32::from((a as i32) < (imm as i32)),
                    0x3 => u32::from(a < imm),
                    0x4 => a ^ imm,
                    0x5 if funct7 == 0x00 => a >> shamt,
                    0x5 if funct7 == 0x20 => ((a as i32) >> shamt) as u32,
                    0x6 => a | imm,
                    0x7 => a & imm,
                    _ => return Err(SimError::IllegalInstruction { pc, inst }),
                };
                self.set_gpr(rd, value, pc, inst)?;
            }
            // op
            0x33 => {
                let a = self.gpr(rs1, pc, inst)?;
                let b = self.gpr(rs2, pc, inst)?;
                let value = match (funct7, funct3) {
                    (0x00, 0x0) => a.wrapping_add(b),
                    (0x20, 0x0) => a.wrapping_sub(b),
                    (0x00, 0x1) => a << (b & 0x1f),
                    (0x00, 0x2) => u32::from((a as i32) < (b as i32)),
                    (0x00, 0x3) => u32::from(a < b),
                    (0x00, 0x4) => a ^ b,
                    (0x00, 0x5) => a >> (b & 0x1f),
                    (0x20, 0x5) => ((a as i32) >> (b & 0x1f)) as u32,
                    (0x00, 0x6) => a | b,
                    (0x00, 0x7) => a & b,
                    _ => return Err(SimError::IllegalInstruction { pc, inst }),
                };
                self.set_gpr(rd, value, pc, inst)?;
            }
            // fence: no-op in this memory model
            0x0f => {}
            // system
            0x73 => match inst {
                // ebreak: end-of-simulation trap, exit code in a0
                0x0010_0073 => {
                    let code = self.gpr(REG_A0, pc, inst)?;
                    self.status.set(SimStatus::Ended { code });
                    next = pc;
                }
                // ecall
                0x0000_0073 => next = self.trap(pc, CAUSE_MACHINE_ECALL),
                // mret
                0x3020_0073 => next = self.csr.mepc,
                _ => {
                    let csr_addr = inst >> 20;
                    let src = self.gpr(rs1, pc, inst)?;
                    let old = match funct3 {
                        0x1 => self.csr.exchange(csr_addr, src)?,
                        0x2 => self.csr.set_bits(csr_addr, src)?,
                        _ => return Err(SimError::IllegalInstruction { pc, inst }),
                    };
                    self.set_gpr(rd, old, pc, inst)?;
                }
            },
            _ => return Err(SimError::IllegalInstruction { pc, inst }),
        }

        self.pc = next;
        Ok(())
    }
}

impl Core for Interpreter {
    fn step(&mut self) -> Result<Option<Commit>, SimError> {
        let pc = self.pc;
        let inst = self.bus.read_word(pc)?;
        self.execute(pc, inst)?;
        if self.status.get().is_running() {
            Ok(Some(Commit { pc }))
        } else {
            // The end-of-simulation trap halts without retiring.
            Ok(None)
        }
    }

    fn context(&self) -> Context {
        Context {
            gprs: self.regs.snapshot(),
            pc: self.pc,
        }
    }

    fn peek(&self, addr: u32) -> Result<u32, SimError> {
        self.bus.peek_word(addr)
    }

    fn ram(&self) -> (u32, &[u8]) {
        (self.bus.ram_base(), self.bus.ram_bytes())
    }
}

impl RefModel for Interpreter {
    fn init(&mut self, _flags: u32) {
        // The reference owns a private status handle; mark it live so its
        // address space accepts stores.
        self.status.set(SimStatus::Running);
    }

    fn sync_memory(&mut self, addr: u32, buf: &mut [u8], dir: Direction) {
        match dir {
            Direction::ToRef => self.bus.write_ram(addr, buf),
            Direction::FromRef => self.bus.read_ram(addr, buf),
        }
    }

    fn sync_registers(&mut self, ctx: &mut Context, dir: Direction) {
        match dir {
            Direction::ToRef => {
                self.regs.restore(&ctx.gprs);
                self.pc = ctx.pc;
            }
            Direction::FromRef => {
                ctx.gprs = self.regs.snapshot();
                ctx.pc = self.pc;
            }
        }
    }

    fn advance(&mut self, n: u64) {
        for _ in 0..n {
            let pc = self.pc;
            let result = self
                .bus
                .read_word(pc)
                .and_then(|inst| self.execute(pc, inst));
            if let Err(e) = result {
                // Swallowed by contract (the classic difftest ABI returns
                // nothing here); the next comparison reports the fallout.
                tracing::error!(error = %e, "reference model fault");
                self.status.set(SimStatus::Aborted);
                break;
            }
        }
    }

    fn raise_interrupt(&mut self, cause: u32) {
        let pc = self.pc;
        self.pc = self.trap(pc, CAUSE_INTERRUPT | cause);
    }
}
