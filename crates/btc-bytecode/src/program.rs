//! The compiled program container (C4): aggregates the instruction stream,
//! BSS allocator, and debug scope stream; serializes and disassembles.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::bss::{BssAllocator, BssError, DEFAULT_BSS_CAPACITY};
use crate::debug::{DebugError, DebugScopeStream, Phase};
use crate::instruction::InstructionStream;
use crate::opcode::Opcode;

/// Magic number identifying a compiled behavior tree program file.
pub const MAGIC: [u8; 4] = *b"CBTP";

/// Current on-disk format version.
pub const VERSION: u32 = 1;

/// Errors raised while saving, loading, or verifying a [`Program`].
#[derive(Debug, Error)]
pub enum ProgramError {
    /// BSS reservation failed during setup.
    #[error(transparent)]
    Bss(#[from] BssError),
    /// Debug scope push/pop was unbalanced.
    #[error(transparent)]
    Debug(#[from] DebugError),
    /// Underlying I/O failure while reading or writing a program file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file did not start with the `CBTP` magic number.
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    BadMagic {
        /// The magic bytes this crate expects.
        expected: [u8; 4],
        /// The magic bytes actually read.
        actual: [u8; 4],
    },
    /// The file's format version is not one this crate can decode.
    #[error("unsupported program version: {0} (current: {VERSION})")]
    UnsupportedVersion(u32),
    /// An instruction in the file used an opcode this crate doesn't know.
    #[error("invalid opcode {0:#06x} at instruction {1}")]
    InvalidOpcode(u16, usize),
    /// A debug entry in the file used a phase byte this crate doesn't know.
    #[error("invalid debug phase byte {0:#x} at debug entry {1}")]
    InvalidPhase(u8, usize),
}

/// A compiled behavior tree program: the instruction stream, the BSS
/// segment's size, and (optionally) a debug scope stream, ready to be
/// serialized per the wire format in `spec.md` §6 or disassembled to text.
#[derive(Debug)]
pub struct Program {
    instructions: InstructionStream,
    bss: BssAllocator,
    debug: DebugScopeStream,
}

impl Program {
    /// Create an empty program with the default BSS capacity and debug
    /// emission disabled.
    pub fn new() -> Self {
        Self {
            instructions: InstructionStream::new(),
            bss: BssAllocator::with_capacity(DEFAULT_BSS_CAPACITY),
            debug: DebugScopeStream::new(),
        }
    }

    /// Create an empty program with an explicit BSS capacity.
    pub fn with_bss_capacity(capacity: u32) -> Self {
        Self {
            instructions: InstructionStream::new(),
            bss: BssAllocator::with_capacity(capacity),
            debug: DebugScopeStream::new(),
        }
    }

    /// Mutable access to the instruction stream.
    pub fn instructions(&mut self) -> &mut InstructionStream {
        &mut self.instructions
    }

    /// Read-only access to the instruction stream.
    pub fn instructions_ref(&self) -> &InstructionStream {
        &self.instructions
    }

    /// Mutable access to the BSS allocator.
    pub fn bss(&mut self) -> &mut BssAllocator {
        &mut self.bss
    }

    /// Read-only access to the BSS allocator.
    pub fn bss_ref(&self) -> &BssAllocator {
        &self.bss
    }

    /// Mutable access to the debug scope stream.
    pub fn debug(&mut self) -> &mut DebugScopeStream {
        &mut self.debug
    }

    /// Read-only access to the debug scope stream.
    pub fn debug_ref(&self) -> &DebugScopeStream {
        &self.debug
    }

    /// A convenience crc32 of the instruction table, for CLI sanity
    /// reporting and test assertions. Not part of the on-disk format.
    pub fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for instr in self.instructions.as_slice() {
            hasher.update(&(instr.opcode as u16).to_le_bytes());
            hasher.update(&instr.a1.to_le_bytes());
            hasher.update(&instr.a2.to_le_bytes());
            hasher.update(&instr.a3.to_le_bytes());
        }
        hasher.finalize()
    }

    fn write_u16(buf: &mut Vec<u8>, value: u16, swap_endian: bool) {
        buf.extend_from_slice(&if swap_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        });
    }

    fn write_u32(buf: &mut Vec<u8>, value: u32, swap_endian: bool) {
        buf.extend_from_slice(&if swap_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        });
    }

    /// Encode this program to the `spec.md` §6 wire format.
    pub fn encode(&self, swap_endian: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        Self::write_u32(&mut buf, VERSION, swap_endian);
        Self::write_u32(&mut buf, self.bss.size(), swap_endian);
        Self::write_u32(&mut buf, self.instructions.count() as u32, swap_endian);
        for instr in self.instructions.as_slice() {
            Self::write_u16(&mut buf, instr.opcode as u16, swap_endian);
            Self::write_u16(&mut buf, 0, swap_endian); // pad
            Self::write_u32(&mut buf, instr.a1, swap_endian);
            Self::write_u32(&mut buf, instr.a2, swap_endian);
            Self::write_u32(&mut buf, instr.a3, swap_endian);
        }
        let debug_entries = self.debug.entries();
        Self::write_u32(&mut buf, debug_entries.len() as u32, swap_endian);
        for entry in debug_entries {
            Self::write_u32(&mut buf, entry.open, swap_endian);
            Self::write_u32(&mut buf, entry.close, swap_endian);
            Self::write_u32(&mut buf, entry.node_id, swap_endian);
            buf.push(entry.phase as u8);
            buf.extend_from_slice(&[0u8; 3]); // pad
        }
        buf
    }

    /// Write this program to `writer` in the `spec.md` §6 wire format.
    pub fn save(&self, writer: &mut impl Write, swap_endian: bool) -> io::Result<()> {
        writer.write_all(&self.encode(swap_endian))
    }

    /// Decode a program previously produced by [`Program::encode`].
    pub fn decode(data: &[u8], swap_endian: bool) -> Result<Self, ProgramError> {
        let mut cursor = Cursor::new(data, swap_endian);
        let magic = cursor.read_bytes(4)?;
        let magic: [u8; 4] = magic.try_into().unwrap();
        if magic != MAGIC {
            return Err(ProgramError::BadMagic {
                expected: MAGIC,
                actual: magic,
            });
        }
        let version = cursor.read_u32()?;
        if version != VERSION {
            return Err(ProgramError::UnsupportedVersion(version));
        }
        let bss_size = cursor.read_u32()?;
        let inst_count = cursor.read_u32()? as usize;

        let mut instructions = InstructionStream::new();
        for i in 0..inst_count {
            let raw_op = cursor.read_u16()?;
            let _pad = cursor.read_u16()?;
            let a1 = cursor.read_u32()?;
            let a2 = cursor.read_u32()?;
            let a3 = cursor.read_u32()?;
            let opcode = Opcode::from_u16(raw_op).ok_or(ProgramError::InvalidOpcode(raw_op, i))?;
            instructions.push(opcode, a1, a2, a3);
        }

        let debug_count = cursor.read_u32()? as usize;
        let mut debug = DebugScopeStream::new();
        debug.set_enabled(debug_count > 0);
        for i in 0..debug_count {
            let open = cursor.read_u32()?;
            let close = cursor.read_u32()?;
            let node_id = cursor.read_u32()?;
            let phase_byte = cursor.read_u8()?;
            let _pad = cursor.read_bytes(3)?;
            let phase =
                Phase::from_u8(phase_byte).ok_or(ProgramError::InvalidPhase(phase_byte, i))?;
            debug.push_debug_scope(node_id, phase, open);
            debug.pop_debug_scope(node_id, phase, close)?;
        }

        let mut bss = BssAllocator::with_capacity(DEFAULT_BSS_CAPACITY.max(bss_size));
        if bss_size > 0 {
            bss.push(bss_size, 1)?;
        }

        Ok(Self {
            instructions,
            bss,
            debug,
        })
    }

    /// Read a program from `reader` in the `spec.md` §6 wire format.
    pub fn load(reader: &mut impl Read, swap_endian: bool) -> Result<Self, ProgramError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::decode(&data, swap_endian)
    }

    /// Write a human-readable disassembly, one line per instruction.
    pub fn disassemble(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "; bss_size={} instructions={}", self.bss.size(), self.instructions.count())?;
        for (index, instr) in self.instructions.as_slice().iter().enumerate() {
            writeln!(
                writer,
                "{:>5}: {:<14} {:#010x} {:#010x} {:#010x}",
                index,
                instr.opcode.mnemonic(),
                instr.a1,
                instr.a2,
                instr.a3,
            )?;
        }
        if !self.debug.entries().is_empty() {
            writeln!(writer, "; debug scopes")?;
            for entry in self.debug.entries() {
                writeln!(
                    writer,
                    ";   [{:>5}, {:>5}) node={} phase={:?}",
                    entry.open, entry.close, entry.node_id, entry.phase
                )?;
            }
        }
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.instructions.as_slice() == other.instructions.as_slice()
            && self.bss.size() == other.bss.size()
            && self.debug.entries() == other.debug.entries()
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    swap_endian: bool,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], swap_endian: bool) -> Self {
        Self { data, pos: 0, swap_endian }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ProgramError> {
        if self.pos + len > self.data.len() {
            return Err(ProgramError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unexpected end of program data",
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ProgramError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, ProgramError> {
        let bytes: [u8; 2] = self.read_bytes(2)?.try_into().unwrap();
        Ok(if self.swap_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    fn read_u32(&mut self) -> Result<u32, ProgramError> {
        let bytes: [u8; 4] = self.read_bytes(4)?.try_into().unwrap();
        Ok(if self.swap_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }
}
