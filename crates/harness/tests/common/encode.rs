//! Raw RV32 instruction encoders for building guest programs in tests.

/// `ebreak` (end-of-simulation trap in this harness).
pub const EBREAK: u32 = 0x0010_0073;

/// `ecall`.
pub const ECALL: u32 = 0x0000_0073;

/// `mret`.
pub const MRET: u32 = 0x3020_0073;

/// Encode an R-type instruction.
pub fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode an I-type instruction.
pub fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
    ((imm as u32) & 0xfff) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode an S-type instruction.
pub fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 5) & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (v & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode a B-type instruction. `imm` is the byte offset (must be even).
pub fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 12) & 0x1) << 31
        | ((v >> 5) & 0x3f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | ((v >> 1) & 0xf) << 8
        | ((v >> 11) & 0x1) << 7
        | (opcode & 0x7f)
}

/// Encode a U-type instruction. `imm20` is the upper-twenty field.
pub fn u_type(opcode: u32, rd: u32, imm20: u32) -> u32 {
    (imm20 & 0xf_ffff) << 12 | (rd & 0x1f) << 7 | (opcode & 0x7f)
}

/// Encode a J-type instruction. `imm` is the byte offset (must be even).
pub fn j_type(opcode: u32, rd: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 20) & 0x1) << 31
        | ((v >> 1) & 0x3ff) << 21
        | ((v >> 11) & 0x1) << 20
        | ((v >> 12) & 0xff) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

/// `addi rd, rs1, imm`.
pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x13, rd, 0x0, rs1, imm)
}

/// `add rd, rs1, rs2`.
pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0x33, rd, 0x0, rs1, rs2, 0x00)
}

/// `sub rd, rs1, rs2`.
pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0x33, rd, 0x0, rs1, rs2, 0x20)
}

/// `lui rd, imm20`.
pub fn lui(rd: u32, imm20: u32) -> u32 {
    u_type(0x37, rd, imm20)
}

/// `auipc rd, imm20`.
pub fn auipc(rd: u32, imm20: u32) -> u32 {
    u_type(0x17, rd, imm20)
}

/// `jal rd, offset`.
pub fn jal(rd: u32, offset: i32) -> u32 {
    j_type(0x6f, rd, offset)
}

/// `beq rs1, rs2, offset`.
pub fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(0x63, 0x0, rs1, rs2, offset)
}

/// `bne rs1, rs2, offset`.
pub fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(0x63, 0x1, rs1, rs2, offset)
}

/// `lb rd, imm(rs1)`.
pub fn lb(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x03, rd, 0x0, rs1, imm)
}

/// `lbu rd, imm(rs1)`.
pub fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x03, rd, 0x4, rs1, imm)
}

/// `lw rd, imm(rs1)`.
pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(0x03, rd, 0x2, rs1, imm)
}

/// `sb rs2, imm(rs1)`.
pub fn sb(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(0x23, 0x0, rs1, rs2, imm)
}

/// `sh rs2, imm(rs1)`.
pub fn sh(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(0x23, 0x1, rs1, rs2, imm)
}

/// `sw rs2, imm(rs1)`.
pub fn sw(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(0x23, 0x2, rs1, rs2, imm)
}

/// `csrrw rd, csr, rs1`.
pub fn csrrw(rd: u32, csr: u32, rs1: u32) -> u32 {
    (csr & 0xfff) << 20 | (rs1 & 0x1f) << 15 | 0x1 << 12 | (rd & 0x1f) << 7 | 0x73
}

/// `csrrs rd, csr, rs1`.
pub fn csrrs(rd: u32, csr: u32, rs1: u32) -> u32 {
    (csr & 0xfff) << 20 | (rs1 & 0x1f) << 15 | 0x2 << 12 | (rd & 0x1f) << 7 | 0x73
}

/// Flattens instruction words into a little-endian boot image.
pub fn image(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
