//! GIF style LZW compression with variable width codes.
//!
//! Codes are packed LSB first. A stream starts with a clear code and ends with an end code, code
//! sizes grow from `code_width + 1` up to 12 bits, after which the table is reset with another
//! clear code.
//!
//! With `predictor` enabled every byte is stored as the difference to its predecessor, which
//! turns gradients into runs.

use std::borrow::Cow;
use std::collections::HashMap;

const MAX_CODES: u16 = 4096;
const MAX_CODE_SIZE: u32 = 12;

const NO_PREFIX: u16 = u16::MAX;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LzwError {
    #[error("code width must be within 2..=8, got {0}")]
    InvalidCodeWidth(u8),

    #[error("byte {byte} does not fit into a {code_width} bit symbol")]
    SymbolOutOfRange { byte: u8, code_width: u8 },

    #[error("invalid code {code}, next free code is {next}")]
    InvalidCode { code: u16, next: u16 },

    #[error("stream ended without an end code")]
    Truncated,
}

#[derive(Clone, Copy)]
struct Codes {
    clear: u16,
    end: u16,
    first_free: u16,
    min_size: u32,
    symbol_mask: u8,
}

impl Codes {
    fn new(code_width: u8) -> Result<Self, LzwError> {
        if !(2..=8).contains(&code_width) {
            return Err(LzwError::InvalidCodeWidth(code_width));
        }

        let clear = 1u16 << code_width;

        Ok(Self {
            clear,
            end: clear + 1,
            first_free: clear + 2,
            min_size: u32::from(code_width) + 1,
            symbol_mask: (clear - 1) as u8,
        })
    }
}

#[derive(Default)]
struct CodeWriter {
    out: Vec<u8>,
    bits: u32,
    used: u32,
}

impl CodeWriter {
    fn put(&mut self, code: u16, size: u32) {
        self.bits |= u32::from(code) << self.used;
        self.used += size;

        while self.used >= 8 {
            self.out.push(self.bits as u8);
            self.bits >>= 8;
            self.used -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.out.push(self.bits as u8);
        }

        self.out
    }
}

struct CodeReader<'a> {
    data: &'a [u8],
    pos: usize,
    bits: u32,
    used: u32,
}

impl<'a> CodeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bits: 0,
            used: 0,
        }
    }

    fn read(&mut self, size: u32) -> Option<u16> {
        while self.used < size {
            let byte = *self.data.get(self.pos)?;

            self.bits |= u32::from(byte) << self.used;
            self.pos += 1;
            self.used += 8;
        }

        let code = (self.bits & ((1 << size) - 1)) as u16;
        self.bits >>= size;
        self.used -= size;

        Some(code)
    }
}

/// Compress `data`, every byte must be smaller than `1 << code_width`
pub fn compress(data: &[u8], code_width: u8, predictor: bool) -> Result<Vec<u8>, LzwError> {
    let codes = Codes::new(code_width)?;

    if let Some(&byte) = data.iter().find(|&&byte| u16::from(byte) >= codes.clear) {
        return Err(LzwError::SymbolOutOfRange { byte, code_width });
    }

    let symbols = if predictor {
        Cow::Owned(apply_predictor(data, codes.symbol_mask))
    } else {
        Cow::Borrowed(data)
    };

    let mut writer = CodeWriter::default();
    let mut dict: HashMap<(u16, u8), u16> = HashMap::new();

    let mut size = codes.min_size;
    let mut next = codes.first_free;

    writer.put(codes.clear, size);

    let mut symbols = symbols.iter().copied();

    if let Some(first) = symbols.next() {
        let mut current = u16::from(first);

        for byte in symbols {
            if let Some(&code) = dict.get(&(current, byte)) {
                current = code;
                continue;
            }

            writer.put(current, size);

            if next < MAX_CODES {
                dict.insert((current, byte), next);
                next += 1;

                if u32::from(next) > (1 << size) && size < MAX_CODE_SIZE {
                    size += 1;
                }
            } else {
                writer.put(codes.clear, size);

                dict.clear();
                next = codes.first_free;
                size = codes.min_size;
            }

            current = u16::from(byte);
        }

        writer.put(current, size);
    }

    writer.put(codes.end, size);

    Ok(writer.finish())
}

/// Decompress a stream produced by [`compress`] with the same `code_width` and `predictor`
pub fn decompress(data: &[u8], code_width: u8, predictor: bool) -> Result<Vec<u8>, LzwError> {
    let codes = Codes::new(code_width)?;

    let mut prefix = vec![NO_PREFIX; usize::from(MAX_CODES)];
    let mut suffix = vec![0u8; usize::from(MAX_CODES)];

    for (code, byte) in suffix.iter_mut().enumerate().take(usize::from(codes.clear)) {
        *byte = code as u8;
    }

    let mut reader = CodeReader::new(data);
    let mut size = codes.min_size;
    let mut next = codes.first_free;
    let mut prev: Option<u16> = None;

    let mut out = Vec::new();
    let mut entry = Vec::new();

    loop {
        let code = reader.read(size).ok_or(LzwError::Truncated)?;

        if code == codes.clear {
            size = codes.min_size;
            next = codes.first_free;
            prev = None;
            continue;
        }

        if code == codes.end {
            break;
        }

        let Some(prev_code) = prev else {
            if code >= codes.clear {
                return Err(LzwError::InvalidCode { code, next });
            }

            out.push(code as u8);
            prev = Some(code);
            continue;
        };

        entry.clear();

        if code < next {
            expand(code, &prefix, &suffix, &mut entry);
        } else if code == next {
            // The code being defined right now: previous entry plus its own first byte
            expand(prev_code, &prefix, &suffix, &mut entry);
            entry.push(entry[0]);
        } else {
            return Err(LzwError::InvalidCode { code, next });
        }

        out.extend_from_slice(&entry);

        if next < MAX_CODES {
            prefix[usize::from(next)] = prev_code;
            suffix[usize::from(next)] = entry[0];
            next += 1;

            // One entry behind the encoder
            if u32::from(next) >= (1 << size) && size < MAX_CODE_SIZE {
                size += 1;
            }
        }

        prev = Some(code);
    }

    if predictor {
        revert_predictor(&mut out, codes.symbol_mask);
    }

    Ok(out)
}

fn expand(mut code: u16, prefix: &[u16], suffix: &[u8], entry: &mut Vec<u8>) {
    let start = entry.len();

    loop {
        entry.push(suffix[usize::from(code)]);

        match prefix[usize::from(code)] {
            NO_PREFIX => break,
            p => code = p,
        }
    }

    entry[start..].reverse();
}

fn apply_predictor(data: &[u8], mask: u8) -> Vec<u8> {
    let mut prev = 0u8;

    data.iter()
        .map(|&byte| {
            let diff = byte.wrapping_sub(prev) & mask;
            prev = byte;
            diff
        })
        .collect()
}

fn revert_predictor(data: &mut [u8], mask: u8) {
    let mut prev = 0u8;

    for byte in data {
        *byte = byte.wrapping_add(prev) & mask;
        prev = *byte;
    }
}
