//! Well-known XMP schemas
//!
//! A read-only table describing the standard schemas: their URI, preferred
//! prefix, a human-readable title and the semantic kind of the properties
//! they define. The parser itself never consults it; the model uses it to
//! annotate what was parsed.

use crate::core::namespace::ns;
use crate::types::value::ShapeTag;

/// Semantic kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PropertyKind {
    Text,
    Integer,
    Real,
    Boolean,
    Date,
    Uri,
    MimeType,
    Locale,
    Rational,
    GpsCoordinate,
    LangAlt,
    TextBag,
    TextSeq,
    DateSeq,
    IntegerSeq,
    Structure,
    Thumbnails,
}

impl PropertyKind {
    /// Shape a well-formed value of this kind has
    pub fn shape(&self) -> ShapeTag {
        match self {
            PropertyKind::LangAlt => ShapeTag::LangAlt,
            PropertyKind::TextBag => ShapeTag::UnorderedList,
            PropertyKind::TextSeq | PropertyKind::DateSeq | PropertyKind::IntegerSeq => {
                ShapeTag::OrderedList
            }
            PropertyKind::Structure => ShapeTag::Structure,
            PropertyKind::Thumbnails => ShapeTag::ThumbnailAlt,
            _ => ShapeTag::Text,
        }
    }
}

/// A property defined by a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyInfo {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// A well-known schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SchemaInfo {
    pub uri: &'static str,
    pub prefix: &'static str,
    pub title: &'static str,
    pub properties: &'static [PropertyInfo],
}

impl SchemaInfo {
    /// Get the definition of a property
    pub fn property(&self, name: &str) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Get the kind of a property, if the schema defines it
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.property(name).map(|p| p.kind)
    }
}

macro_rules! properties {
    ($($name:literal => $kind:ident),* $(,)?) => {
        &[$(PropertyInfo { name: $name, kind: PropertyKind::$kind }),*]
    };
}

/// Table of well-known schemas
pub static SCHEMAS: &[SchemaInfo] = &[
    SchemaInfo {
        uri: ns::DC,
        prefix: "dc",
        title: "Dublin Core",
        properties: properties! {
            "contributor" => TextBag,
            "coverage" => Text,
            "creator" => TextSeq,
            "date" => DateSeq,
            "description" => LangAlt,
            "format" => MimeType,
            "identifier" => Text,
            "language" => TextBag,
            "publisher" => TextBag,
            "relation" => TextBag,
            "rights" => LangAlt,
            "source" => Text,
            "subject" => TextBag,
            "title" => LangAlt,
            "type" => TextBag,
        },
    },
    SchemaInfo {
        uri: ns::XMP,
        prefix: "xmp",
        title: "XMP Basic",
        properties: properties! {
            "Advisory" => TextBag,
            "BaseURL" => Uri,
            "CreateDate" => Date,
            "CreatorTool" => Text,
            "Identifier" => TextBag,
            "Label" => Text,
            "MetadataDate" => Date,
            "ModifyDate" => Date,
            "Nickname" => Text,
            "Rating" => Integer,
            "Thumbnails" => Thumbnails,
        },
    },
    SchemaInfo {
        uri: ns::XMP_RIGHTS,
        prefix: "xmpRights",
        title: "XMP Rights Management",
        properties: properties! {
            "Certificate" => Uri,
            "Marked" => Boolean,
            "Owner" => TextBag,
            "UsageTerms" => LangAlt,
            "WebStatement" => Uri,
        },
    },
    SchemaInfo {
        uri: ns::XMP_MM,
        prefix: "xmpMM",
        title: "XMP Media Management",
        properties: properties! {
            "DerivedFrom" => Structure,
            "DocumentID" => Uri,
            "History" => TextSeq,
            "InstanceID" => Uri,
            "ManagedFrom" => Structure,
            "Manager" => Text,
            "ManageTo" => Uri,
            "ManageUI" => Uri,
            "ManagerVariant" => Text,
            "OriginalDocumentID" => Text,
            "RenditionClass" => Text,
            "RenditionParams" => Text,
            "VersionID" => Text,
            "Versions" => TextSeq,
        },
    },
    SchemaInfo {
        uri: ns::PDF,
        prefix: "pdf",
        title: "Adobe PDF",
        properties: properties! {
            "Keywords" => Text,
            "PDFVersion" => Text,
            "Producer" => Text,
        },
    },
    SchemaInfo {
        uri: ns::PHOTOSHOP,
        prefix: "photoshop",
        title: "Photoshop",
        properties: properties! {
            "AuthorsPosition" => Text,
            "CaptionWriter" => Text,
            "Category" => Text,
            "City" => Text,
            "Country" => Text,
            "Credit" => Text,
            "DateCreated" => Date,
            "Headline" => Text,
            "Instructions" => Text,
            "Source" => Text,
            "State" => Text,
            "SupplementalCategories" => TextBag,
            "TransmissionReference" => Text,
            "Urgency" => Integer,
        },
    },
    SchemaInfo {
        uri: ns::TIFF,
        prefix: "tiff",
        title: "TIFF",
        properties: properties! {
            "ImageWidth" => Integer,
            "ImageLength" => Integer,
            "BitsPerSample" => IntegerSeq,
            "Compression" => Integer,
            "PhotometricInterpretation" => Integer,
            "Orientation" => Integer,
            "SamplesPerPixel" => Integer,
            "PlanarConfiguration" => Integer,
            "YCbCrSubSampling" => IntegerSeq,
            "YCbCrPositioning" => Integer,
            "XResolution" => Rational,
            "YResolution" => Rational,
            "ResolutionUnit" => Integer,
            "DateTime" => Date,
            "ImageDescription" => LangAlt,
            "Make" => Text,
            "Model" => Text,
            "Software" => Text,
            "Artist" => Text,
            "Copyright" => LangAlt,
        },
    },
    SchemaInfo {
        uri: ns::EXIF,
        prefix: "exif",
        title: "EXIF",
        properties: properties! {
            "ExifVersion" => Text,
            "ColorSpace" => Integer,
            "PixelXDimension" => Integer,
            "PixelYDimension" => Integer,
            "UserComment" => LangAlt,
            "DateTimeOriginal" => Date,
            "DateTimeDigitized" => Date,
            "ExposureTime" => Rational,
            "FNumber" => Rational,
            "ExposureProgram" => Integer,
            "ISOSpeedRatings" => IntegerSeq,
            "ShutterSpeedValue" => Rational,
            "ApertureValue" => Rational,
            "BrightnessValue" => Rational,
            "ExposureBiasValue" => Rational,
            "MaxApertureValue" => Rational,
            "SubjectDistance" => Rational,
            "MeteringMode" => Integer,
            "LightSource" => Integer,
            "Flash" => Structure,
            "FocalLength" => Rational,
            "FocalLengthIn35mmFilm" => Integer,
            "WhiteBalance" => Integer,
            "GPSLatitude" => GpsCoordinate,
            "GPSLongitude" => GpsCoordinate,
            "GPSAltitude" => Rational,
            "GPSTimeStamp" => Date,
        },
    },
    SchemaInfo {
        uri: ns::EXIF_AUX,
        prefix: "aux",
        title: "EXIF Additional",
        properties: properties! {
            "Lens" => Text,
            "SerialNumber" => Text,
        },
    },
    SchemaInfo {
        uri: ns::IPTC_CORE,
        prefix: "Iptc4xmpCore",
        title: "IPTC Core",
        properties: properties! {
            "CiAdrCity" => Text,
            "CiAdrCtry" => Text,
            "CiAdrExtadr" => Text,
            "CiAdrPcode" => Text,
            "CiAdrRegion" => Text,
            "CiEmailWork" => Text,
            "CiTelWork" => Text,
            "CiUrlWork" => Uri,
            "CountryCode" => Locale,
            "CreatorContactInfo" => Structure,
            "IntellectualGenre" => Text,
            "Location" => Text,
            "Scene" => TextBag,
            "SubjectCode" => TextBag,
        },
    },
];

/// Find a well-known schema by URI
pub fn lookup_schema(uri: &str) -> Option<&'static SchemaInfo> {
    SCHEMAS.iter().find(|schema| schema.uri == uri)
}

/// Find a well-known schema by its preferred prefix
pub fn lookup_schema_by_prefix(prefix: &str) -> Option<&'static SchemaInfo> {
    SCHEMAS.iter().find(|schema| schema.prefix == prefix)
}
