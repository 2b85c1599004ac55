// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value container decoder.

use crate::config::HEADER_SIZE;
use crate::error::{Error, Result};
use crate::scene::{
    AttributeType, AttributeValue, Rgb, Rgba, SceneObjectRef, Vec2f, Vec3f, Vec4f,
};
use byteorder::{ByteOrder, LittleEndian};

/// Longest valid variable-length uint (64 bits in 7-bit groups).
const MAX_VL_UINT_BYTES: usize = 10;

/// Cursor over an encoded value container.
///
/// Values carry no type tags: the caller reads them back in the order they
/// were written. Every read is bounds-checked and fails with
/// [`Error::TruncatedDecode`] past the end of the data.
///
/// # Example
///
/// ```rust
/// use rdl2::{ValueContainerDequeue, ValueContainerEnqueue};
///
/// let mut enq = ValueContainerEnqueue::new();
/// enq.enq_bool(false);
/// enq.enq_float(2.5);
/// let buf = enq.finalize();
///
/// let mut deq = ValueContainerDequeue::new(&buf).unwrap();
/// assert_eq!(deq.deq_bool().unwrap(), false);
/// assert_eq!(deq.deq_float().unwrap(), 2.5);
/// assert_eq!(deq.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ValueContainerDequeue<'a> {
    buf: &'a [u8],
    pos: usize,
    data_size: usize,
    size_checked: bool,
}

impl<'a> ValueContainerDequeue<'a> {
    /// Strict mode: a nonzero header must equal `buf.len()`.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmallForHeader { len: buf.len() });
        }
        let header = LittleEndian::read_u64(&buf[..HEADER_SIZE]);
        if header != 0 && header != buf.len() as u64 {
            log::debug!(
                "[ValueContainerDequeue::new] header {} != buffer {}",
                header,
                buf.len()
            );
            return Err(Error::SizeMismatch {
                data_size: buf.len(),
                header,
            });
        }
        Ok(Self {
            buf,
            pos: HEADER_SIZE,
            data_size: buf.len(),
            size_checked: true,
        })
    }

    /// Trusting mode: the header is skipped and `buf.len()` is taken as the
    /// data size. Reads stay bounds-checked.
    pub fn new_unchecked(buf: &'a [u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmallForHeader { len: buf.len() });
        }
        Ok(Self {
            buf,
            pos: HEADER_SIZE,
            data_size: buf.len(),
            size_checked: false,
        })
    }

    /// Total size of the container, header included.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data_size - self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos == self.data_size
    }

    /// Header value as stored (0 when the length was not recorded).
    pub fn header(&self) -> u64 {
        LittleEndian::read_u64(&self.buf[..HEADER_SIZE])
    }

    pub fn deq_bool(&mut self) -> Result<bool> {
        let offset = self.pos;
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidData(format!(
                "bool byte {} at offset {}",
                other, offset
            ))),
        }
    }

    pub fn deq_int(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn deq_long(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn deq_float(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn deq_double(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    pub fn deq_vl_uint(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        for i in 0..MAX_VL_UINT_BYTES {
            let byte = self.take(1)?[0];
            let bits = u64::from(byte & 0x7f);
            let shift = 7 * i as u32;
            if shift == 63 && bits > 1 {
                break;
            }
            value |= bits << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::InvalidData(format!(
            "variable-length uint at offset {} overflows 64 bits",
            start
        )))
    }

    pub fn deq_string(&mut self) -> Result<String> {
        let len = self.deq_count(1)?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::InvalidData(format!("string at offset {} is not UTF-8: {}", offset, e))
        })
    }

    pub fn deq_rgb(&mut self) -> Result<Rgb> {
        let [r, g, b] = self.deq_floats::<3>()?;
        Ok(Rgb::new(r, g, b))
    }

    pub fn deq_rgba(&mut self) -> Result<Rgba> {
        let [r, g, b, a] = self.deq_floats::<4>()?;
        Ok(Rgba::new(r, g, b, a))
    }

    pub fn deq_vec2f(&mut self) -> Result<Vec2f> {
        Ok(Vec2f::from_array(self.deq_floats()?))
    }

    pub fn deq_vec3f(&mut self) -> Result<Vec3f> {
        Ok(Vec3f::from_array(self.deq_floats()?))
    }

    pub fn deq_vec4f(&mut self) -> Result<Vec4f> {
        Ok(Vec4f::from_array(self.deq_floats()?))
    }

    pub fn deq_scene_object(&mut self) -> Result<Option<SceneObjectRef>> {
        if self.deq_bool()? {
            Ok(Some(self.deq_scene_object_ref()?))
        } else {
            Ok(None)
        }
    }

    /// Read one value of the given type.
    pub fn deq_value(&mut self, attr_type: AttributeType) -> Result<AttributeValue> {
        Ok(match attr_type {
            AttributeType::Bool => AttributeValue::Bool(self.deq_bool()?),
            AttributeType::Int => AttributeValue::Int(self.deq_int()?),
            AttributeType::Long => AttributeValue::Long(self.deq_long()?),
            AttributeType::Float => AttributeValue::Float(self.deq_float()?),
            AttributeType::Double => AttributeValue::Double(self.deq_double()?),
            AttributeType::String => AttributeValue::String(self.deq_string()?),
            AttributeType::Rgb => AttributeValue::Rgb(self.deq_rgb()?),
            AttributeType::Rgba => AttributeValue::Rgba(self.deq_rgba()?),
            AttributeType::Vec2f => AttributeValue::Vec2f(self.deq_vec2f()?),
            AttributeType::Vec3f => AttributeValue::Vec3f(self.deq_vec3f()?),
            AttributeType::Vec4f => AttributeValue::Vec4f(self.deq_vec4f()?),
            AttributeType::SceneObject => AttributeValue::SceneObject(self.deq_scene_object()?),
            AttributeType::BoolVector => AttributeValue::BoolVector(self.deq_vector(1, Self::deq_bool)?),
            AttributeType::IntVector => AttributeValue::IntVector(self.deq_vector(4, Self::deq_int)?),
            AttributeType::LongVector => AttributeValue::LongVector(self.deq_vector(8, Self::deq_long)?),
            AttributeType::FloatVector => AttributeValue::FloatVector(self.deq_vector(4, Self::deq_float)?),
            AttributeType::DoubleVector => AttributeValue::DoubleVector(self.deq_vector(8, Self::deq_double)?),
            AttributeType::StringVector => AttributeValue::StringVector(self.deq_vector(1, Self::deq_string)?),
            AttributeType::RgbVector => AttributeValue::RgbVector(self.deq_vector(12, Self::deq_rgb)?),
            AttributeType::RgbaVector => AttributeValue::RgbaVector(self.deq_vector(16, Self::deq_rgba)?),
            AttributeType::Vec2fVector => AttributeValue::Vec2fVector(self.deq_vector(8, Self::deq_vec2f)?),
            AttributeType::Vec3fVector => AttributeValue::Vec3fVector(self.deq_vector(12, Self::deq_vec3f)?),
            AttributeType::Vec4fVector => AttributeValue::Vec4fVector(self.deq_vector(16, Self::deq_vec4f)?),
            AttributeType::SceneObjectVector => {
                AttributeValue::SceneObjectVector(self.deq_vector(2, Self::deq_scene_object_ref)?)
            }
        })
    }

    /// Skip `n` bytes.
    pub fn skip_bytes(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Multi-line dump of the cursor state, each line prefixed with `indent`.
    pub fn show(&self, indent: &str) -> String {
        format!(
            "{indent}ValueContainerDequeue {{\n\
             {indent}   position:{}\n\
             {indent}  remaining:{} byte\n\
             {indent}   dataSize:{} byte{}\n\
             {indent}}}",
            self.pos,
            self.remaining(),
            self.data_size,
            if self.size_checked { "" } else { " (unchecked)" }
        )
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data_size)
            .ok_or(Error::TruncatedDecode {
                need: n,
                offset: self.pos,
                have: self.data_size - self.pos,
            })?;
        let buf = self.buf;
        let bytes = &buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Element count, rejected up front if `count * min_size` cannot fit.
    fn deq_count(&mut self, min_size: usize) -> Result<usize> {
        let count = self.deq_vl_uint()?;
        let have = self.remaining();
        match usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(min_size).map(|need| (c, need)))
        {
            Some((c, need)) if need <= have => Ok(c),
            Some((_, need)) => Err(Error::TruncatedDecode {
                need,
                offset: self.pos,
                have,
            }),
            None => Err(Error::InvalidData(format!(
                "element count {} at offset {} is too large",
                count, self.pos
            ))),
        }
    }

    fn deq_vector<T>(
        &mut self,
        min_size: usize,
        mut f: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.deq_count(min_size)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(f(self)?);
        }
        Ok(items)
    }

    fn deq_floats<const N: usize>(&mut self) -> Result<[f32; N]> {
        let bytes = self.take(4 * N)?;
        let mut out = [0.0f32; N];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    fn deq_scene_object_ref(&mut self) -> Result<SceneObjectRef> {
        let class_name = self.deq_string()?;
        let name = self.deq_string()?;
        Ok(SceneObjectRef { class_name, name })
    }
}
