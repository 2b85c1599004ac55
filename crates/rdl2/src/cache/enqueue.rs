// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value container encoder.

use crate::config::HEADER_SIZE;
use crate::scene::{AttributeValue, Rgb, Rgba, SceneObjectRef, Vec2f, Vec3f, Vec4f};
use byteorder::{ByteOrder, LittleEndian};

/// Appends positional attribute values to a byte buffer.
///
/// The buffer starts with a zeroed length header. [`finalize`] patches it
/// with the total length; [`finalize_unsized`] leaves it at 0 (unchecked).
///
/// [`finalize`]: ValueContainerEnqueue::finalize
/// [`finalize_unsized`]: ValueContainerEnqueue::finalize_unsized
#[derive(Debug, Clone)]
pub struct ValueContainerEnqueue {
    buf: Vec<u8>,
}

impl Default for ValueContainerEnqueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueContainerEnqueue {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(HEADER_SIZE));
        buf.resize(HEADER_SIZE, 0);
        Self { buf }
    }

    /// Bytes written so far, header included.
    pub fn data_size(&self) -> usize {
        self.buf.len()
    }

    pub fn enq_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn enq_int(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn enq_long(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn enq_float(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn enq_double(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Unsigned int in 7-bit groups, least significant first. The high bit
    /// of each byte flags a following byte.
    pub fn enq_vl_uint(&mut self, mut v: u64) {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Byte length, then UTF-8 bytes.
    pub fn enq_string(&mut self, v: &str) {
        self.enq_vl_uint(v.len() as u64);
        self.buf.extend_from_slice(v.as_bytes());
    }

    pub fn enq_rgb(&mut self, v: Rgb) {
        self.enq_floats(&[v.r, v.g, v.b]);
    }

    pub fn enq_rgba(&mut self, v: Rgba) {
        self.enq_floats(&[v.r, v.g, v.b, v.a]);
    }

    pub fn enq_vec2f(&mut self, v: Vec2f) {
        self.enq_floats(&v.to_array());
    }

    pub fn enq_vec3f(&mut self, v: Vec3f) {
        self.enq_floats(&v.to_array());
    }

    pub fn enq_vec4f(&mut self, v: Vec4f) {
        self.enq_floats(&v.to_array());
    }

    /// Presence byte, then class name and object name when present.
    pub fn enq_scene_object(&mut self, v: Option<&SceneObjectRef>) {
        match v {
            Some(r) => {
                self.enq_bool(true);
                self.enq_scene_object_ref(r);
            }
            None => self.enq_bool(false),
        }
    }

    /// Any attribute value, without a type tag.
    pub fn enq_value(&mut self, value: &AttributeValue) {
        match value {
            AttributeValue::Bool(v) => self.enq_bool(*v),
            AttributeValue::Int(v) => self.enq_int(*v),
            AttributeValue::Long(v) => self.enq_long(*v),
            AttributeValue::Float(v) => self.enq_float(*v),
            AttributeValue::Double(v) => self.enq_double(*v),
            AttributeValue::String(v) => self.enq_string(v),
            AttributeValue::Rgb(v) => self.enq_rgb(*v),
            AttributeValue::Rgba(v) => self.enq_rgba(*v),
            AttributeValue::Vec2f(v) => self.enq_vec2f(*v),
            AttributeValue::Vec3f(v) => self.enq_vec3f(*v),
            AttributeValue::Vec4f(v) => self.enq_vec4f(*v),
            AttributeValue::SceneObject(v) => self.enq_scene_object(v.as_ref()),
            AttributeValue::BoolVector(v) => self.enq_vector(v, |e, x| e.enq_bool(*x)),
            AttributeValue::IntVector(v) => self.enq_vector(v, |e, x| e.enq_int(*x)),
            AttributeValue::LongVector(v) => self.enq_vector(v, |e, x| e.enq_long(*x)),
            AttributeValue::FloatVector(v) => self.enq_vector(v, |e, x| e.enq_float(*x)),
            AttributeValue::DoubleVector(v) => self.enq_vector(v, |e, x| e.enq_double(*x)),
            AttributeValue::StringVector(v) => self.enq_vector(v, |e, x| e.enq_string(x)),
            AttributeValue::RgbVector(v) => self.enq_vector(v, |e, x| e.enq_rgb(*x)),
            AttributeValue::RgbaVector(v) => self.enq_vector(v, |e, x| e.enq_rgba(*x)),
            AttributeValue::Vec2fVector(v) => self.enq_vector(v, |e, x| e.enq_vec2f(*x)),
            AttributeValue::Vec3fVector(v) => self.enq_vector(v, |e, x| e.enq_vec3f(*x)),
            AttributeValue::Vec4fVector(v) => self.enq_vector(v, |e, x| e.enq_vec4f(*x)),
            AttributeValue::SceneObjectVector(v) => {
                self.enq_vector(v, |e, x| e.enq_scene_object_ref(x))
            }
        }
    }

    /// Patch the header with the total length and return the buffer.
    pub fn finalize(mut self) -> Vec<u8> {
        let total = self.buf.len() as u64;
        LittleEndian::write_u64(&mut self.buf[..HEADER_SIZE], total);
        self.buf
    }

    /// Return the buffer with a 0 header (length not recorded).
    pub fn finalize_unsized(self) -> Vec<u8> {
        self.buf
    }

    /// Multi-line dump, each line prefixed with `indent`.
    pub fn show(&self, indent: &str) -> String {
        format!(
            "{indent}ValueContainerEnqueue {{\n\
             {indent}  dataSize:{} byte\n\
             {indent}}}",
            self.buf.len()
        )
    }

    fn enq_scene_object_ref(&mut self, r: &SceneObjectRef) {
        self.enq_string(&r.class_name);
        self.enq_string(&r.name);
    }

    fn enq_floats(&mut self, values: &[f32]) {
        for v in values {
            self.enq_float(*v);
        }
    }

    fn enq_vector<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        self.enq_vl_uint(items.len() as u64);
        for item in items {
            f(self, item);
        }
    }
}
