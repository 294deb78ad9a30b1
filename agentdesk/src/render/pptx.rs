//! Minimal PresentationML writer using zip + quick-xml escaping.
//!
//! Produces one slide master, one blank layout and one theme; every slide
//! draws its own text boxes so no placeholder inheritance is needed.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::models::{Slide, Theme};

pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const SLIDE_CX: u64 = 12_192_000;
const SLIDE_CY: u64 = 6_858_000;
const MARGIN_X: u64 = 685_800;
const FIRST_SLIDE_ID: usize = 256;
// rId1 is the master and rId2 the theme; slides follow.
const FIRST_SLIDE_REL: usize = 3;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Renders `slides` into `.pptx` bytes. The first slide is laid out as a title slide.
pub fn render_pptx(slides: &[Slide], theme: Theme) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<zip::write::ExtendedFileOptions> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut write_part = |name: &str, body: &str| -> Result<()> {
        zip.start_file(name, options.clone())?;
        zip.write_all(body.as_bytes())?;
        Ok(())
    };

    write_part("[Content_Types].xml", &content_types(slides.len()))?;
    write_part("_rels/.rels", ROOT_RELS)?;
    write_part("ppt/presentation.xml", &presentation_xml(slides.len()))?;
    write_part(
        "ppt/_rels/presentation.xml.rels",
        &presentation_rels(slides.len()),
    )?;
    write_part("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    write_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        SLIDE_MASTER_RELS,
    )?;
    write_part("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
    write_part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        SLIDE_LAYOUT_RELS,
    )?;
    write_part("ppt/theme/theme1.xml", &theme_xml(theme))?;

    for (index, slide) in slides.iter().enumerate() {
        let number = index + 1;
        let body = if index == 0 {
            title_slide_xml(slide, theme)
        } else {
            content_slide_xml(slide, theme)
        };
        write_part(&format!("ppt/slides/slide{number}.xml"), &body)?;
        write_part(
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            SLIDE_RELS,
        )?;
    }

    drop(write_part);
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Escapes text for XML and drops control characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect();
    escape(cleaned.as_str()).into_owned()
}

fn content_types(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{slides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#;

fn presentation_xml(slide_count: usize) -> String {
    let slide_ids: String = (0..slide_count)
        .map(|i| {
            format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + i,
                FIRST_SLIDE_REL + i
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let slides: String = (0..slide_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                FIRST_SLIDE_REL + i,
                i + 1
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>{slides}</Relationships>"#
    )
}

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn slide_master_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {NS}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="2000"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#
    )
}

fn slide_layout_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme_xml(theme: Theme) -> String {
    let accent = theme.accent;
    let solid = |val: &str| format!(r#"<a:solidFill><a:srgbClr val="{val}"/></a:solidFill>"#);
    let fills = format!("{}{}{}", solid("FFFFFF"), solid(accent), solid("404040"));
    let line = |w: u32| {
        format!(r#"<a:ln w="{w}"><a:solidFill><a:srgbClr val="{accent}"/></a:solidFill></a:ln>"#)
    };
    let lines = format!("{}{}{}", line(9525), line(25400), line(38100));
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);
    let font = |face: &str| {
        format!(r#"<a:latin typeface="{face}"/><a:ea typeface=""/><a:cs typeface=""/>"#)
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Agentdesk"><a:themeElements><a:clrScheme name="Agentdesk"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="{background}"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="4B5563"/></a:accent2><a:accent3><a:srgbClr val="9CA3AF"/></a:accent3><a:accent4><a:srgbClr val="F59E0B"/></a:accent4><a:accent5><a:srgbClr val="10B981"/></a:accent5><a:accent6><a:srgbClr val="6366F1"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Agentdesk"><a:majorFont>{major}</a:majorFont><a:minorFont>{minor}</a:minorFont></a:fontScheme><a:fmtScheme name="Agentdesk"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effect}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
        background = theme.background,
        major = font("Calibri Light"),
        minor = font("Calibri"),
    )
}

struct TextBox<'a> {
    id: u32,
    name: &'a str,
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
    paragraphs: String,
}

impl TextBox<'_> {
    fn to_xml(&self) -> String {
        format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
            id = self.id,
            name = self.name,
            x = self.x,
            y = self.y,
            cx = self.cx,
            cy = self.cy,
            paragraphs = self.paragraphs,
        )
    }
}

fn run(text: &str, size: u32, bold: bool, color: &str) -> String {
    let b = if bold { r#" b="1""# } else { "" };
    format!(
        r#"<a:r><a:rPr lang="en-US" sz="{size}"{b} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
        xml_text(text)
    )
}

fn slide_xml(theme: Theme, shapes: &[TextBox<'_>]) -> String {
    let shapes: String = shapes.iter().map(TextBox::to_xml).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{background}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{EMPTY_TREE}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        background = theme.background,
    )
}

fn title_slide_xml(slide: &Slide, theme: Theme) -> String {
    let title = TextBox {
        id: 2,
        name: "Title",
        x: MARGIN_X,
        y: 2_130_000,
        cx: SLIDE_CX - 2 * MARGIN_X,
        cy: 1_470_000,
        paragraphs: format!(
            r#"<a:p><a:pPr algn="ctr"/>{}</a:p>"#,
            run(&slide.title, 4400, true, theme.accent)
        ),
    };

    let subtitle_text = slide.bullets.join("; ");
    let subtitle = TextBox {
        id: 3,
        name: "Subtitle",
        x: MARGIN_X,
        y: 3_800_000,
        cx: SLIDE_CX - 2 * MARGIN_X,
        cy: 1_750_000,
        paragraphs: if subtitle_text.is_empty() {
            r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
        } else {
            format!(
                r#"<a:p><a:pPr algn="ctr"/>{}</a:p>"#,
                run(&subtitle_text, 2400, false, "404040")
            )
        },
    };

    slide_xml(theme, &[title, subtitle])
}

fn content_slide_xml(slide: &Slide, theme: Theme) -> String {
    let title = TextBox {
        id: 2,
        name: "Title",
        x: MARGIN_X,
        y: 457_200,
        cx: SLIDE_CX - 2 * MARGIN_X,
        cy: 1_143_000,
        paragraphs: format!("<a:p>{}</a:p>", run(&slide.title, 3200, true, theme.accent)),
    };

    let bullets: String = slide
        .bullets
        .iter()
        .map(|bullet| {
            format!(
                r#"<a:p><a:pPr marL="342900" indent="-342900"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>{}</a:p>"#,
                run(bullet, 2000, false, "1F2937")
            )
        })
        .collect();
    let body = TextBox {
        id: 3,
        name: "Content",
        x: MARGIN_X,
        y: 1_828_800,
        cx: SLIDE_CX - 2 * MARGIN_X,
        cy: 4_343_400,
        paragraphs: if bullets.is_empty() {
            r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
        } else {
            bullets
        },
    };

    slide_xml(theme, &[title, body])
}
