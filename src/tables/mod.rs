//! Table catalog: `head`/`hhea`/`maxp` are parsed eagerly and
//! mandatorily; every other table is parsed best-effort from the raw
//! directory and downgrades to "absent" on failure.

pub mod aat;
pub mod bitmap_data;
pub mod bitmap_location;
pub mod cff;
pub mod cff2;
pub mod cmap;
pub mod colr;
pub mod cpal;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
pub mod sbix;
pub mod stat;
pub mod variations;
pub mod vhea;
pub mod vmtx;
pub mod vorg;

use crate::error::FaceParsingError;
use crate::ids::Tag;
use crate::raw_face::RawFace;

use bitmap_data::BitmapGlyph;
use bitmap_location::{BitmapLocation, BitmapLocationTable};
use cff::CffTable;
use cff2::Cff2Table;
use cmap::Cmap;
use colr::Colr;
use cpal::Cpal;
use glyf::GlyfTable;
use head::Head;
use hhea::Hhea;
use hmtx::MetricsTable;
use loca::Loca;
use maxp::Maxp;
use name::NameTable;
use os2::Os2;
use post::Post;
use sbix::Sbix;
use stat::Stat;
use layout::LayoutTable;
use variations::{Avar, Fvar, Gvar, Mvar};
use vhea::Vhea;
use vmtx::VerticalMetrics;
use vorg::Vorg;

fn tag(bytes: &[u8; 4]) -> Tag {
    Tag::new(bytes)
}

/// Every table this crate understands, resolved once at [`FaceTables::new`]
/// time from a [`RawFace`]'s directory. Mandatory tables (`head`, `hhea`,
/// `maxp`) are `Result`s the facade must handle; every other field is an
/// `Option` that is simply absent if missing or malformed.
pub struct FaceTables<'a> {
    pub raw: RawFace<'a>,

    pub head: Head,
    pub hhea: Hhea,
    pub maxp: Maxp,

    pub vhea: Option<Vhea>,
    pub hmtx: Option<MetricsTable<'a>>,
    pub vmtx: Option<VerticalMetrics<'a>>,
    pub post: Option<Post<'a>>,
    pub os2: Option<Os2>,
    pub name: Option<NameTable<'a>>,
    pub vorg: Option<Vorg<'a>>,
    pub stat: Option<Stat<'a>>,

    pub cmap: Option<Cmap<'a>>,
    pub loca: Option<Loca<'a>>,
    pub glyf: Option<GlyfTable<'a>>,
    pub cff: Option<CffTable<'a>>,
    pub cff2: Option<Cff2Table<'a>>,

    pub cpal: Option<Cpal<'a>>,
    pub colr: Option<Colr<'a>>,
    pub sbix: Option<Sbix<'a>>,
    pub bitmap_location: Option<(Tag, BitmapLocationTable<'a>)>,
    pub bitmap_data: Option<&'a [u8]>,

    pub fvar: Option<Fvar<'a>>,
    pub avar: Option<Avar<'a>>,
    pub gvar: Option<Gvar<'a>>,
    pub hvar: Option<variations::MetricsVariations<'a>>,
    pub vvar: Option<variations::MetricsVariations<'a>>,
    pub mvar: Option<Mvar<'a>>,

    /// `GDEF` carries no script/feature/lookup-list header of its own; it is
    /// exposed as raw table bytes for a consumer's glyph-class/attach-list
    /// queries rather than through [`LayoutTable`].
    pub gdef: Option<&'a [u8]>,
    pub gsub: Option<LayoutTable<'a>>,
    pub gpos: Option<LayoutTable<'a>>,
}

impl<'a> FaceTables<'a> {
    pub fn new(raw: RawFace<'a>) -> core::result::Result<Self, FaceParsingError> {
        let head_data = raw.table_data(tag(b"head")).ok_or(FaceParsingError::NoHeadTable)?;
        let head = Head::parse(head_data).map_err(|_| FaceParsingError::NoHeadTable)?;

        let hhea_data = raw.table_data(tag(b"hhea")).ok_or(FaceParsingError::NoHheaTable)?;
        let hhea = Hhea::parse(hhea_data).map_err(|_| FaceParsingError::NoHheaTable)?;

        let maxp_data = raw.table_data(tag(b"maxp")).ok_or(FaceParsingError::NoMaxpTable)?;
        let maxp = Maxp::parse(maxp_data).map_err(|_| FaceParsingError::NoMaxpTable)?;

        let num_glyphs = maxp.num_glyphs;

        let vhea = raw.table_data(tag(b"vhea")).and_then(|d| Vhea::parse(d).ok());
        let hmtx = raw
            .table_data(tag(b"hmtx"))
            .and_then(|d| MetricsTable::parse(d, num_glyphs, hhea.number_of_h_metrics).ok());
        let vmtx = vhea
            .as_ref()
            .and_then(|vhea| raw.table_data(tag(b"vmtx")).and_then(|d| {
                MetricsTable::parse(d, num_glyphs, vhea.number_of_v_metrics).ok()
            }));
        let post = raw.table_data(tag(b"post")).and_then(|d| Post::parse(d).ok());
        let os2 = raw.table_data(tag(b"OS/2")).and_then(|d| Os2::parse(d).ok());
        let name = raw.table_data(tag(b"name")).and_then(|d| NameTable::parse(d).ok());
        let vorg = raw.table_data(tag(b"VORG")).and_then(|d| Vorg::parse(d).ok());
        let stat = raw.table_data(tag(b"STAT")).and_then(|d| Stat::parse(d).ok());

        let cmap = raw.table_data(tag(b"cmap")).and_then(|d| Cmap::parse(d).ok());
        let loca = raw
            .table_data(tag(b"loca"))
            .and_then(|d| Loca::parse(d, num_glyphs, head.index_to_loc_format).ok());
        let glyf = raw.table_data(tag(b"glyf")).map(GlyfTable::new);
        let cff = raw.table_data(tag(b"CFF ")).and_then(|d| CffTable::parse(d).ok());
        let cff2 = raw.table_data(tag(b"CFF2")).and_then(|d| Cff2Table::parse(d).ok());

        let cpal = raw.table_data(tag(b"CPAL")).and_then(|d| Cpal::parse(d).ok());
        let colr = raw.table_data(tag(b"COLR")).and_then(|d| Colr::parse(d).ok());
        let sbix = raw.table_data(tag(b"sbix")).and_then(|d| Sbix::parse(d, num_glyphs).ok());

        let bitmap_location = [(tag(b"CBLC"), tag(b"CBDT")), (tag(b"EBLC"), tag(b"EBDT"))]
            .into_iter()
            .find_map(|(loc_tag, data_tag)| {
                let loc = raw.table_data(loc_tag).and_then(|d| BitmapLocationTable::parse(d).ok())?;
                Some((data_tag, loc))
            });
        let bitmap_data = bitmap_location.as_ref().and_then(|(data_tag, _)| raw.table_data(*data_tag));

        let fvar = raw.table_data(tag(b"fvar")).and_then(|d| Fvar::parse(d).ok());
        let avar = raw.table_data(tag(b"avar")).and_then(|d| Avar::parse(d).ok());
        let gvar = raw.table_data(tag(b"gvar")).and_then(|d| Gvar::parse(d).ok());
        let hvar = raw.table_data(tag(b"HVAR")).and_then(|d| variations::MetricsVariations::parse(d).ok());
        let vvar = raw.table_data(tag(b"VVAR")).and_then(|d| variations::MetricsVariations::parse(d).ok());
        let mvar = raw.table_data(tag(b"MVAR")).and_then(|d| Mvar::parse(d).ok());

        let gdef = raw.table_data(tag(b"GDEF"));
        let gsub = raw.table_data(tag(b"GSUB")).and_then(|d| LayoutTable::parse(d).ok());
        let gpos = raw.table_data(tag(b"GPOS")).and_then(|d| LayoutTable::parse(d).ok());

        Ok(FaceTables {
            raw,
            head,
            hhea,
            maxp,
            vhea,
            hmtx,
            vmtx,
            post,
            os2,
            name,
            vorg,
            stat,
            cmap,
            loca,
            glyf,
            cff,
            cff2,
            cpal,
            colr,
            sbix,
            bitmap_location,
            bitmap_data,
            fvar,
            avar,
            gvar,
            hvar,
            vvar,
            mvar,
            gdef,
            gsub,
            gpos,
        })
    }

    pub fn is_variable(&self) -> bool {
        self.fvar.is_some()
    }

    /// The bitmap location table for the strike indexed by `ppem`, along
    /// with the sfnt tag of the matching data table (`CBDT` or `EBDT`).
    pub fn bitmap_location_table(&self) -> Option<&BitmapLocationTable<'a>> {
        self.bitmap_location.as_ref().map(|(_, loc)| loc)
    }

    pub fn bitmap_glyph(&self, strike: u32, glyph_id: crate::ids::GlyphId) -> Option<BitmapGlyph<'a>> {
        let location: BitmapLocation = self.bitmap_location_table()?.locate(strike, glyph_id)?;
        bitmap_data::parse_bitmap_glyph(self.bitmap_data?, location).ok()
    }
}
