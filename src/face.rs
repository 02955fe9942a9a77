//! The `Face` facade: the single entry point a consumer
//! constructs, assembling [`RawFace`] plus [`FaceTables`] and exposing
//! every metrics/style/glyph/color/variation query as a pure function of
//! `(Face, argument, variation coordinates)`.

use crate::error::{FaceParsingError, VariationSetError};
use crate::ids::{GlyphId, Rect, Tag};
use crate::numeric::{F2Dot14, Fixed};
use crate::outline::OutlineBuilder;
use crate::paint::Painter;
use crate::raw_face::RawFace;
use crate::tables::cpal::Color;
use crate::tables::os2::EmbeddingPermissions;
use crate::tables::sbix::GlyphImage;
use crate::tables::variations::{normalize_user_coords, NormalizedCoords};
use crate::tables::FaceTables;

/// `OS/2.usWeightClass`, named per the standard values registered in the
/// OpenType spec; any other value round-trips through [`Weight::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    Other(u16),
}

impl Weight {
    fn from_class(class: u16) -> Self {
        match class {
            100 => Weight::Thin,
            200 => Weight::ExtraLight,
            300 => Weight::Light,
            400 => Weight::Normal,
            500 => Weight::Medium,
            600 => Weight::SemiBold,
            700 => Weight::Bold,
            800 => Weight::ExtraBold,
            900 => Weight::Black,
            other => Weight::Other(other),
        }
    }

    pub fn to_number(self) -> u16 {
        match self {
            Weight::Thin => 100,
            Weight::ExtraLight => 200,
            Weight::Light => 300,
            Weight::Normal => 400,
            Weight::Medium => 500,
            Weight::SemiBold => 600,
            Weight::Bold => 700,
            Weight::ExtraBold => 800,
            Weight::Black => 900,
            Weight::Other(v) => v,
        }
    }
}

/// `OS/2.usWidthClass`, named per the standard 1-9 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl Width {
    fn from_class(class: u16) -> Self {
        match class {
            1 => Width::UltraCondensed,
            2 => Width::ExtraCondensed,
            3 => Width::Condensed,
            4 => Width::SemiCondensed,
            6 => Width::SemiExpanded,
            7 => Width::Expanded,
            8 => Width::ExtraExpanded,
            9 => Width::UltraExpanded,
            _ => Width::Normal,
        }
    }

    pub fn to_percent(self) -> f32 {
        match self {
            Width::UltraCondensed => 50.0,
            Width::ExtraCondensed => 62.5,
            Width::Condensed => 75.0,
            Width::SemiCondensed => 87.5,
            Width::Normal => 100.0,
            Width::SemiExpanded => 112.5,
            Width::Expanded => 125.0,
            Width::ExtraExpanded => 150.0,
            Width::UltraExpanded => 200.0,
        }
    }
}

/// Coarse slant classification, derived from `OS/2.fsSelection`/`head.macStyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Italic,
    Oblique,
}

/// Underline or strikeout placement, in design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetrics {
    pub position: i16,
    pub thickness: i16,
}

/// `sub`/`superscript`/typographic/vertical ascender-descender-gap triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerticalMetrics {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

/// The two-valued `EmbeddingPermissions`/`fsType` surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub allow_subsetting: bool,
    pub allow_outline_embedding: bool,
}

/// A single variation axis as surfaced to callers: tag, range, and
/// (if named) its `name` table name id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationAxisInfo {
    pub tag: Tag,
    pub min_value: Fixed,
    pub default_value: Fixed,
    pub max_value: Fixed,
    pub name_id: u16,
}

/// The parsed container plus every table this crate understands, and the
/// face's current (possibly non-default) variation coordinates.
///
/// `Face` borrows the byte slice it was built from; it never copies it.
/// The only owned, heap-backed state is `coords`, mutated in place by
/// [`Face::set_variation`].
pub struct Face<'a> {
    tables: FaceTables<'a>,
    coords: NormalizedCoords,
    user_coords: Vec<(Tag, Fixed)>,
}

impl<'a> Face<'a> {
    /// Parse `face_index` out of `data`: magic dispatch, collection
    /// indexing, table directory, then the three mandatory headers.
    pub fn parse(data: &'a [u8], face_index: u32) -> Result<Self, FaceParsingError> {
        let raw = RawFace::parse(data, face_index).map_err(|_| classify_container_error(data, face_index))?;
        let tables = FaceTables::new(raw)?;
        Ok(Face { tables, coords: NormalizedCoords::default(), user_coords: Vec::new() })
    }

    /// The number of faces in `data` if it is a `ttcf` collection, or
    /// `None` for a bare single-face font.
    pub fn fonts_in_collection(data: &[u8]) -> Option<u32> {
        RawFace::fonts_in_collection(data)
    }

    fn coords(&self) -> &[F2Dot14] {
        self.coords.as_slice()
    }

    // ---- metrics ----------------------------------------------------

    pub fn units_per_em(&self) -> u16 {
        self.tables.head.units_per_em
    }

    pub fn ascender(&self) -> i16 {
        self.tables.hhea.ascender
    }

    pub fn descender(&self) -> i16 {
        self.tables.hhea.descender
    }

    pub fn line_gap(&self) -> i16 {
        self.tables.hhea.line_gap
    }

    pub fn x_height(&self) -> Option<i16> {
        self.tables.os2.as_ref().and_then(|os2| os2.sx_height)
    }

    pub fn capital_height(&self) -> Option<i16> {
        self.tables.os2.as_ref().and_then(|os2| os2.s_cap_height)
    }

    pub fn underline_metrics(&self) -> Option<LineMetrics> {
        let post = self.tables.post.as_ref()?;
        Some(LineMetrics { position: post.underline_position, thickness: post.underline_thickness })
    }

    pub fn strikeout_metrics(&self) -> Option<LineMetrics> {
        let os2 = self.tables.os2.as_ref()?;
        Some(LineMetrics { position: os2.y_strikeout_position, thickness: os2.y_strikeout_size })
    }

    pub fn subscript_metrics(&self) -> Option<LineMetrics> {
        let os2 = self.tables.os2.as_ref()?;
        Some(LineMetrics { position: os2.y_subscript_y_offset, thickness: os2.y_subscript_y_size })
    }

    pub fn superscript_metrics(&self) -> Option<LineMetrics> {
        let os2 = self.tables.os2.as_ref()?;
        Some(LineMetrics { position: os2.y_superscript_y_offset, thickness: os2.y_superscript_y_size })
    }

    /// `OS/2`'s typographic (`sTypo*`) ascender/descender/line-gap triple,
    /// preferred over `hhea`'s by layout engines when `USE_TYPO_METRICS` is set.
    pub fn typographic_metrics(&self) -> Option<VerticalMetrics> {
        let os2 = self.tables.os2.as_ref()?;
        Some(VerticalMetrics {
            ascender: os2.s_typo_ascender,
            descender: os2.s_typo_descender,
            line_gap: os2.s_typo_line_gap,
        })
    }

    pub fn vertical_metrics(&self) -> Option<VerticalMetrics> {
        let vhea = self.tables.vhea.as_ref()?;
        Some(VerticalMetrics { ascender: vhea.ascender, descender: vhea.descender, line_gap: vhea.line_gap })
    }

    pub fn global_bounding_box(&self) -> Rect {
        Rect {
            x_min: self.tables.head.x_min,
            y_min: self.tables.head.y_min,
            x_max: self.tables.head.x_max,
            y_max: self.tables.head.y_max,
        }
    }

    // ---- style --------------------------------------------------------

    pub fn is_bold(&self) -> bool {
        match &self.tables.os2 {
            Some(os2) => os2.is_bold(),
            None => self.tables.head.mac_style.contains(crate::tables::head::MacStyle::BOLD),
        }
    }

    pub fn is_italic(&self) -> bool {
        match &self.tables.os2 {
            Some(os2) => os2.is_italic(),
            None => self.tables.head.mac_style.contains(crate::tables::head::MacStyle::ITALIC),
        }
    }

    pub fn is_oblique(&self) -> bool {
        self.tables.os2.as_ref().is_some_and(|os2| os2.is_oblique())
    }

    pub fn is_monospaced(&self) -> bool {
        self.tables.post.as_ref().is_some_and(|post| post.is_fixed_pitch)
    }

    pub fn is_regular(&self) -> bool {
        self.tables.os2.as_ref().is_some_and(|os2| os2.is_regular())
    }

    pub fn is_variable(&self) -> bool {
        self.tables.is_variable()
    }

    pub fn italic_angle(&self) -> Option<f32> {
        self.tables.post.as_ref().map(|post| post.italic_angle.to_f32())
    }

    pub fn weight(&self) -> Weight {
        self.tables.os2.as_ref().map(|os2| Weight::from_class(os2.us_weight_class)).unwrap_or(Weight::Normal)
    }

    pub fn width(&self) -> Width {
        self.tables.os2.as_ref().map(|os2| Width::from_class(os2.us_width_class)).unwrap_or(Width::Normal)
    }

    pub fn style(&self) -> Style {
        if self.is_italic() {
            Style::Italic
        } else if self.is_oblique() {
            Style::Oblique
        } else {
            Style::Normal
        }
    }

    pub fn permissions(&self) -> Option<Permissions> {
        let fs_type = self.tables.os2.as_ref()?.fs_type;
        let restricted = fs_type.contains(EmbeddingPermissions::RESTRICTED);
        Some(Permissions {
            allow_subsetting: !fs_type.contains(EmbeddingPermissions::NO_SUBSETTING) && !restricted,
            allow_outline_embedding: !fs_type.contains(EmbeddingPermissions::BITMAP_EMBEDDING_ONLY)
                && !restricted,
        })
    }

    pub fn is_subsetting_allowed(&self) -> bool {
        self.permissions().is_none_or(|p| p.allow_subsetting)
    }

    pub fn is_outline_embedding_allowed(&self) -> bool {
        self.permissions().is_none_or(|p| p.allow_outline_embedding)
    }

    /// The four `ulUnicodeRange` bitfields from `OS/2`, raw (each bit's
    /// meaning is a fixed registry the consumer is expected to already know).
    pub fn unicode_ranges(&self) -> Option<[u32; 4]> {
        self.tables.os2.as_ref().map(|os2| os2.ul_unicode_range)
    }

    pub fn names(&self) -> impl Iterator<Item = crate::tables::name::NameRecord> + 'a {
        self.tables.name.as_ref().map(|n| n.records()).into_iter().flatten()
    }

    pub fn name(&self, name_id: u16) -> Option<String> {
        self.tables.name.as_ref()?.name(name_id)
    }

    // ---- glyph indexing -------------------------------------------------

    pub fn glyph_index(&self, c: char) -> Option<GlyphId> {
        self.tables.cmap.as_ref()?.preferred_subtable()?.glyph_index(c as u32)
    }

    pub fn glyph_variation_index(&self, c: char, variation_selector: char) -> Option<GlyphId> {
        use crate::tables::cmap::UnicodeVariationResult;
        let table = self.tables.cmap.as_ref()?.variation_subtable()?;
        match table.resolve(c as u32, variation_selector as u32)? {
            UnicodeVariationResult::Glyph(id) => Some(id),
            UnicodeVariationResult::UseDefault => self.glyph_index(c),
        }
    }

    pub fn glyph_index_by_name(&self, name: &str) -> Option<GlyphId> {
        let post = self.tables.post.as_ref()?;
        (0..self.tables.maxp.num_glyphs)
            .map(GlyphId::new)
            .find(|&id| post.glyph_name(id) == Some(name))
    }

    // ---- glyph geometry -------------------------------------------------

    pub fn outline_glyph(&self, glyph_id: GlyphId, builder: &mut dyn OutlineBuilder) -> Option<Rect> {
        if let (Some(glyf), Some(loca)) = (&self.tables.glyf, &self.tables.loca) {
            return glyf.outline(glyph_id, loca, builder).ok().flatten();
        }
        if let Some(cff) = &self.tables.cff {
            return cff.outline(glyph_id, builder).ok();
        }
        if let Some(cff2) = &self.tables.cff2 {
            return cff2.outline(glyph_id, builder).ok();
        }
        None
    }

    pub fn glyph_bounding_box(&self, glyph_id: GlyphId) -> Option<Rect> {
        struct NullBuilder;
        impl OutlineBuilder for NullBuilder {
            fn move_to(&mut self, _x: f32, _y: f32) {}
            fn line_to(&mut self, _x: f32, _y: f32) {}
            fn quad_to(&mut self, _x1: f32, _y1: f32, _x: f32, _y: f32) {}
            fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, _y: f32) {}
            fn close(&mut self) {}
        }
        self.outline_glyph(glyph_id, &mut NullBuilder)
    }

    /// Horizontal advance in design units: `hmtx`, augmented by `HVAR`'s
    /// delta when the face carries variation coordinates.
    pub fn glyph_hor_advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let base = self.tables.hmtx.as_ref()?.advance(glyph_id)? as f32;
        let delta = self.tables.hvar.as_ref().and_then(|hvar| hvar.advance_delta(glyph_id, self.coords()));
        Some((base + delta.unwrap_or(0.0)).round().max(0.0) as u16)
    }

    pub fn glyph_ver_advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let base = self.tables.vmtx.as_ref()?.advance(glyph_id)? as f32;
        let delta = self.tables.vvar.as_ref().and_then(|vvar| vvar.advance_delta(glyph_id, self.coords()));
        Some((base + delta.unwrap_or(0.0)).round().max(0.0) as u16)
    }

    pub fn glyph_hor_side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let base = self.tables.hmtx.as_ref()?.side_bearing(glyph_id)? as f32;
        let delta = self.tables.hvar.as_ref().and_then(|hvar| hvar.bearing_delta(glyph_id, self.coords()));
        crate::numeric::f32_to_i16_saturating(base + delta.unwrap_or(0.0))
    }

    pub fn glyph_ver_side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let base = self.tables.vmtx.as_ref()?.side_bearing(glyph_id)? as f32;
        let delta = self.tables.vvar.as_ref().and_then(|vvar| vvar.bearing_delta(glyph_id, self.coords()));
        crate::numeric::f32_to_i16_saturating(base + delta.unwrap_or(0.0))
    }

    /// `VORG`'s per-glyph vertical origin override, if present; `None`
    /// rather than a synthesized default, so callers can fall back to
    /// `ascender` themselves.
    pub fn glyph_y_origin(&self, glyph_id: GlyphId) -> Option<i16> {
        Some(self.tables.vorg.as_ref()?.y_origin(glyph_id))
    }

    /// The four synthetic "phantom points" TrueType hinting and `gvar`
    /// attach to every glyph: left/right at the horizontal origin and
    /// advance width, top/bottom at the vertical origin and advance height.
    pub fn glyph_phantom_points(&self, glyph_id: GlyphId) -> Option<[(f32, f32); 4]> {
        let bbox = self.glyph_bounding_box(glyph_id).unwrap_or_default();
        let lsb = self.glyph_hor_side_bearing(glyph_id).unwrap_or(0) as f32;
        let hor_advance = self.glyph_hor_advance(glyph_id).unwrap_or(0) as f32;
        let x_min = bbox.x_min as f32;
        let left = (x_min - lsb, 0.0);
        let right = (left.0 + hor_advance, 0.0);

        let y_origin = self.glyph_y_origin(glyph_id).unwrap_or(self.tables.hhea.ascender) as f32;
        let ver_advance = self.glyph_ver_advance(glyph_id).unwrap_or(0) as f32;
        let top = (0.0, y_origin);
        let bottom = (0.0, y_origin - ver_advance);

        Some([left, right, top, bottom])
    }

    // ---- images & color -------------------------------------------------

    pub fn glyph_raster_image(&self, glyph_id: GlyphId, ppem: u16) -> Option<GlyphImage<'a>> {
        if let Some(sbix) = &self.tables.sbix {
            if let Some(strike) = sbix.strike_for_ppem(ppem) {
                if let Some(image) = strike.get(glyph_id) {
                    return Some(image);
                }
            }
        }
        None
    }

    pub fn glyph_bitmap(&self, ppem: u8, glyph_id: GlyphId) -> Option<crate::tables::bitmap_data::BitmapGlyph<'a>> {
        let strike = self.tables.bitmap_location_table()?.strike_for_ppem(ppem)?;
        self.tables.bitmap_glyph(strike, glyph_id)
    }

    /// Raw `SVG ` table document payload is not modeled by this crate (the
    /// pack carries no SVG-in-OpenType precedent); always `None`.
    pub fn glyph_svg_image(&self, _glyph_id: GlyphId) -> Option<&'a [u8]> {
        None
    }

    pub fn is_color_glyph(&self, glyph_id: GlyphId) -> bool {
        self.tables.colr.as_ref().is_some_and(|colr| colr.is_color_glyph(glyph_id))
            || self.tables.sbix.is_some()
            || self.tables.bitmap_location.is_some()
    }

    pub fn color_palettes(&self) -> u16 {
        self.tables.cpal.as_ref().map(|cpal| cpal.num_palettes()).unwrap_or(0)
    }

    pub fn palette_color(&self, palette: u16, entry: u16) -> Option<Color> {
        self.tables.cpal.as_ref()?.color(palette, entry)
    }

    pub fn paint_color_glyph(&self, glyph_id: GlyphId, painter: &mut dyn Painter) {
        if let Some(colr) = &self.tables.colr {
            colr.paint(glyph_id, painter);
        }
    }

    // ---- variations -----------------------------------------------------

    pub fn variation_axes(&self) -> impl Iterator<Item = VariationAxisInfo> + 'a {
        let fvar = self.tables.fvar;
        (0..fvar.map(|f| f.axis_count()).unwrap_or(0)).filter_map(move |i| {
            fvar.and_then(|f| f.axis(i)).map(|a| VariationAxisInfo {
                tag: a.tag,
                min_value: a.min_value,
                default_value: a.default_value,
                max_value: a.max_value,
                name_id: a.name_id,
            })
        })
    }

    /// Sets `axis`'s user-space value, re-normalizing the full coordinate
    /// vector through `fvar`/`avar`. Other axes keep the user-space value
    /// from their own most recent `set_variation` call (or their `fvar`
    /// default, if never set) — the user-space request is retained
    /// alongside the normalized coordinates precisely so a later call for a
    /// different axis doesn't lose it.
    pub fn set_variation(&mut self, axis: Tag, value: f32) -> Result<(), VariationSetError> {
        let fvar = self.tables.fvar.ok_or(VariationSetError::UnknownAxis)?;
        let (_, axis_record) = fvar.axis_by_tag(axis).ok_or(VariationSetError::UnknownAxis)?;
        if axis_record.min_value.to_f32() > axis_record.max_value.to_f32() {
            return Err(VariationSetError::InvalidValue);
        }

        match self.user_coords.iter_mut().find(|(tag, _)| *tag == axis) {
            Some((_, v)) => *v = Fixed::from_f32(value),
            None => self.user_coords.push((axis, Fixed::from_f32(value))),
        }

        self.coords = normalize_user_coords(&fvar, self.tables.avar.as_ref(), &self.user_coords);
        Ok(())
    }

    pub fn variation_coordinates(&self) -> &[F2Dot14] {
        self.coords()
    }

    pub fn has_non_default_variation_coordinates(&self) -> bool {
        self.coords().iter().any(|c| *c != F2Dot14::ZERO)
    }
}

fn classify_container_error(data: &[u8], face_index: u32) -> FaceParsingError {
    match RawFace::fonts_in_collection(data) {
        Some(num_fonts) if face_index >= num_fonts => FaceParsingError::FaceIndexOutOfBounds,
        Some(_) => FaceParsingError::MalformedFont,
        None if data.len() < 4 => FaceParsingError::UnknownMagic,
        None => {
            let magic = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
            match magic {
                0x0001_0000 | 0x7472_7565 | 0x4F54_544F => {
                    if face_index != 0 {
                        FaceParsingError::FaceIndexOutOfBounds
                    } else {
                        FaceParsingError::MalformedFont
                    }
                }
                _ => FaceParsingError::UnknownMagic,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_font(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());

        let header_len = 12 + tables.len() * 16;
        let mut body = Vec::new();
        let mut records = Vec::new();
        let mut offset = header_len;
        for (t, data) in tables {
            records.push((*t, offset as u32, data.len() as u32));
            body.extend_from_slice(data);
            offset += data.len();
        }
        for (t, off, len) in &records {
            out.extend_from_slice(*t);
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&off.to_be_bytes());
            out.extend_from_slice(&len.to_be_bytes());
        }
        out.extend_from_slice(&body);
        out
    }

    fn minimal_head() -> Vec<u8> {
        let mut d = vec![0u8; 54];
        d[18..20].copy_from_slice(&1000u16.to_be_bytes());
        d[50..52].copy_from_slice(&1i16.to_be_bytes());
        d
    }

    fn minimal_hhea() -> Vec<u8> {
        let mut d = vec![0u8; 36];
        d[4..6].copy_from_slice(&800i16.to_be_bytes()); // ascender
        d
    }

    fn minimal_maxp() -> Vec<u8> {
        let mut d = vec![0u8; 6];
        d[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
        d[4..6].copy_from_slice(&2u16.to_be_bytes());
        d
    }

    fn minimal_font() -> Vec<u8> {
        build_font(&[(b"head", &minimal_head()), (b"hhea", &minimal_hhea()), (b"maxp", &minimal_maxp())])
    }

    #[test]
    fn parses_minimal_font_and_exposes_basic_metrics() {
        let data = minimal_font();
        let face = Face::parse(&data, 0).unwrap();
        assert_eq!(face.units_per_em(), 1000);
        assert_eq!(face.ascender(), 800);
        assert!(!face.is_variable());
        assert!(!face.is_bold());
    }

    #[test]
    fn missing_head_table_surfaces_no_head_table() {
        let data = build_font(&[(b"hhea", &minimal_hhea()), (b"maxp", &minimal_maxp())]);
        let err = Face::parse(&data, 0).unwrap_err();
        assert_eq!(err, FaceParsingError::NoHeadTable);
    }

    #[test]
    fn unrecognized_magic_is_reported_distinctly() {
        let data = vec![0u8; 16];
        let err = Face::parse(&data, 0).unwrap_err();
        assert_eq!(err, FaceParsingError::UnknownMagic);
    }

    #[test]
    fn out_of_range_face_index_on_collection_is_reported() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x7474_6366u32.to_be_bytes()); // ttcf
        data.extend_from_slice(&0u32.to_be_bytes()); // version
        data.extend_from_slice(&1u32.to_be_bytes()); // numFonts
        data.extend_from_slice(&12u32.to_be_bytes()); // offset to face 0 (unused here)
        let err = Face::parse(&data, 5).unwrap_err();
        assert_eq!(err, FaceParsingError::FaceIndexOutOfBounds);
    }

    #[test]
    fn set_variation_rejects_unknown_axis() {
        let data = minimal_font();
        let mut face = Face::parse(&data, 0).unwrap();
        let err = face.set_variation(Tag::new(b"wght"), 500.0).unwrap_err();
        assert_eq!(err, VariationSetError::UnknownAxis);
    }
}
