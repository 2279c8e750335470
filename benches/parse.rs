use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use xmpstream::{ParseOptions, XmpModel, XmpParseContext};

// Simple XMP packet with a single shorthand property
const SIMPLE_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/"
                   xmp:CreatorTool="Adobe Photoshop CS2 Windows"/>
</rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

// Packet with arrays, structures and qualifiers
const COMPLEX_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
                   xmlns:xmp="http://ns.adobe.com/xap/1.0/"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:xmpMM="http://ns.adobe.com/xap/1.0/mm/"
                   xmlns:tiff="http://ns.adobe.com/tiff/1.0/"
                   xmlns:exif="http://ns.adobe.com/exif/1.0/"
                   xmlns:Iptc4xmpCore="http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"
                   xmp:CreatorTool="Adobe Photoshop CS2 Windows"
                   xmp:CreateDate="2006-04-25T15:32:01+02:00"
                   xmp:ModifyDate="2006-04-27T15:38:36.655+02:00"
                   xmpMM:DocumentID="uuid:FE607D9B5FD4DA118B7787757E22306B"
                   tiff:Orientation="1"
                   tiff:XResolution="720000/10000"
                   exif:PixelXDimension="200"
                   exif:PixelYDimension="200">
    <dc:description>
      <rdf:Alt>
        <rdf:li xml:lang="x-default">a test file (öäüßÖÄÜ€中文)</rdf:li>
        <rdf:li xml:lang="en">A test file with special characters</rdf:li>
      </rdf:Alt>
    </dc:description>
    <dc:creator>
      <rdf:Seq>
        <rdf:li>Llywelyn</rdf:li>
        <rdf:li>Stefan</rdf:li>
      </rdf:Seq>
    </dc:creator>
    <dc:subject>
      <rdf:Bag>
        <rdf:li>purple</rdf:li>
        <rdf:li>square</rdf:li>
        <rdf:li>XMP</rdf:li>
        <rdf:li>test</rdf:li>
      </rdf:Bag>
    </dc:subject>
    <dc:format>
      <rdf:Description>
        <rdf:value>image/jpeg</rdf:value>
        <xmp:Label>primary</xmp:Label>
      </rdf:Description>
    </dc:format>
    <Iptc4xmpCore:CreatorContactInfo rdf:parseType="Resource">
      <Iptc4xmpCore:CiAdrCity>Seattle</Iptc4xmpCore:CiAdrCity>
      <Iptc4xmpCore:CiAdrCtry>US</Iptc4xmpCore:CiAdrCtry>
      <Iptc4xmpCore:CiEmailWork>test@example.com</Iptc4xmpCore:CiEmailWork>
    </Iptc4xmpCore:CreatorContactInfo>
  </rdf:Description>
</rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

fn bench_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| {
        b.iter(|| {
            let _model = XmpModel::parse(black_box(SIMPLE_XMP.as_bytes()), ParseOptions::default())
                .unwrap();
        });
    });
}

fn bench_parse_complex(c: &mut Criterion) {
    c.bench_function("parse_complex", |b| {
        b.iter(|| {
            let _model = XmpModel::parse(black_box(COMPLEX_XMP.as_bytes()), ParseOptions::default())
                .unwrap();
        });
    });
}

fn bench_parse_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_chunked");
    group.throughput(Throughput::Bytes(COMPLEX_XMP.len() as u64));
    for chunk in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut context = XmpParseContext::new(XmpModel::new(), ParseOptions::default());
                for piece in black_box(COMPLEX_XMP.as_bytes()).chunks(chunk) {
                    context.parse(piece).unwrap();
                }
                context.end_parse().unwrap();
            });
        });
    }
    group.finish();
}

fn bench_find_xpacket(c: &mut Criterion) {
    // packet at the end of a megabyte of binary data
    let mut data: Vec<u8> = (0..=255u8).cycle().take(1 << 20).collect();
    data.extend_from_slice(SIMPLE_XMP.as_bytes());

    c.bench_function("find_xpacket", |b| {
        b.iter(|| {
            let _model = XmpModel::parse(black_box(&data), ParseOptions::default().find_xpacket())
                .unwrap();
        });
    });
}

fn bench_parse_from_str_trait(c: &mut Criterion) {
    c.bench_function("parse_from_str_trait", |b| {
        b.iter(|| {
            let _model: XmpModel = black_box(SIMPLE_XMP).parse().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_complex,
    bench_parse_chunked,
    bench_find_xpacket,
    bench_parse_from_str_trait
);
criterion_main!(benches);
