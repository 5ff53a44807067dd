use lopdf::xref::{Xref, XrefEntry, XrefType};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

/// A PDF writer that streams large objects (images, content) as soon as they are produced
/// and buffers the small structural ones (pages tree, catalog, resources) until `finish`.
pub struct StreamingPdfWriter<W: Write + Seek> {
    writer: W,
    xref: Xref,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    xobjects: Dictionary,
    page_ids: Vec<ObjectId>,
    info_id: Option<ObjectId>,
    buffered_objects: BTreeMap<ObjectId, Object>,
}

impl<W: Write + Seek> StreamingPdfWriter<W> {
    pub fn new(mut writer: W, version: &str) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", version).as_bytes())?;

        Ok(Self {
            writer,
            xref: Xref::new(0, XrefType::CrossReferenceTable),
            max_id: 3,
            resources_id: (1, 0),
            pages_id: (2, 0),
            catalog_id: (3, 0),
            xobjects: Dictionary::new(),
            page_ids: Vec::new(),
            info_id: None,
            buffered_objects: BTreeMap::new(),
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered_objects.insert(id, object);
        id
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: Object) {
        if id.0 > self.max_id {
            self.max_id = id.0;
        }
        self.buffered_objects.insert(id, object);
    }

    /// Writes an object to the output immediately and returns its id.
    pub fn write_object(&mut self, object: Object) -> io::Result<ObjectId> {
        let id = self.new_object_id();
        serialize::write_indirect_object(&mut self.writer, id, &object, &mut self.xref)?;
        Ok(id)
    }

    /// Writes an already encoded content stream.
    pub fn write_content_stream(&mut self, content: Vec<u8>) -> io::Result<ObjectId> {
        self.write_object(Object::Stream(Stream::new(dictionary! {}, content)))
    }

    /// Makes an XObject available to every page under `/XObject /<name>`.
    pub fn register_xobject(&mut self, name: &str, id: ObjectId) {
        self.xobjects.set(name.as_bytes(), Object::Reference(id));
    }

    pub fn set_page_ids(&mut self, page_ids: Vec<ObjectId>) {
        self.page_ids = page_ids;
    }

    pub fn set_info(&mut self, info: Dictionary) {
        let id = self.buffer_object(info.into());
        self.info_id = Some(id);
    }

    pub fn finish(mut self) -> io::Result<W> {
        let resources = dictionary! { "XObject" => std::mem::take(&mut self.xobjects) };
        self.buffer_object_at_id(self.resources_id, resources.into());

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict.into());

        let catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        self.buffer_object_at_id(self.catalog_id, catalog_dict.into());

        for (id, object) in &self.buffered_objects {
            serialize::write_indirect_object(&mut self.writer, *id, object, &mut self.xref)?;
        }

        let xref_start = self.writer.stream_position()?;
        let size = self.max_id + 1;
        serialize::write_xref(&mut self.writer, &self.xref, size)?;

        let mut trailer = dictionary! { "Size" => size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = self.info_id {
            trailer.set("Info", info_id);
        }
        writeln!(self.writer, "trailer")?;
        serialize::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer)
    }
}

mod serialize {
    use super::*;
    use lopdf::StringFormat;

    pub fn write_indirect_object<W: Write + Seek>(
        writer: &mut W,
        id: ObjectId,
        object: &Object,
        xref: &mut Xref,
    ) -> io::Result<()> {
        let offset = u32::try_from(writer.stream_position()?)
            .map_err(|_| io::Error::other("PDF exceeds the 4 GiB cross-reference limit"))?;
        xref.insert(id.0, XrefEntry::Normal { offset, generation: id.1 });
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")
    }

    /// Formats a real without exponent notation; PDF readers reject `1e-5`.
    fn format_real(value: f32) -> String {
        if !value.is_finite() {
            return "0".to_string();
        }
        let formatted = format!("{:.3}", value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        match trimmed {
            "" | "-" | "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }

    fn write_literal_string(writer: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
        writer.write_all(b"(")?;
        for &byte in bytes {
            match byte {
                b'(' | b')' | b'\\' => writer.write_all(&[b'\\', byte])?,
                b'\r' => writer.write_all(b"\\r")?,
                b'\n' => writer.write_all(b"\\n")?,
                _ => writer.write_all(&[byte])?,
            }
        }
        writer.write_all(b")")
    }

    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => writer.write_all(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => write!(writer, "{}", i),
            Object::Real(r) => writer.write_all(format_real(*r).as_bytes()),
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(s, StringFormat::Literal) => write_literal_string(writer, s),
            Object::String(s, StringFormat::Hexadecimal) => {
                writer.write_all(b"<")?;
                for byte in s {
                    write!(writer, "{:02X}", byte)?;
                }
                writer.write_all(b">")
            }
            Object::Array(items) => {
                writer.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, item)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        writer.write_all(b"<<")?;
        let sorted: BTreeMap<_, _> = dict.iter().collect();
        for (key, value) in sorted {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    /// Writes a single-section cross-reference table covering ids `0..size`.
    /// Ids that were allocated but never written are recorded as free.
    pub fn write_xref<W: Write>(writer: &mut W, xref: &Xref, size: u32) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", size)?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..size {
            match xref.get(id) {
                Some(XrefEntry::Normal { offset, generation }) => {
                    writeln!(writer, "{:010} {:05} n ", offset, generation)?
                }
                _ => writeln!(writer, "0000000000 00000 f ")?,
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn reals_are_trimmed() {
            assert_eq!(format_real(62.0), "62");
            assert_eq!(format_real(46.5), "46.5");
            assert_eq!(format_real(0.775), "0.775");
            assert_eq!(format_real(-0.0001), "0");
            assert_eq!(format_real(f32::NAN), "0");
        }

        #[test]
        fn literal_strings_escape_delimiters() {
            let mut out = Vec::new();
            write_literal_string(&mut out, b"a(b)\\c\n").unwrap();
            assert_eq!(out, b"(a\\(b\\)\\\\c\\n)");
        }
    }
}
