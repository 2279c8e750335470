//! Tests driving XmpParseContext with a custom handler
//!
//! These check the event stream a handler sees: schema scopes, properties,
//! chunked input, packets embedded in binary data and error reporting.

use xmpstream::{ParseOptions, ParseState, XmpError, XmpHandler, XmpParseContext, XmpResult, XmpValue};

const PACKET: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:format>image/jpeg</dc:format>
   <dc:subject><rdf:Bag><rdf:li>sky</rdf:li><rdf:li>sea</rdf:li></rdf:Bag></dc:subject>
  </rdf:Description>
  <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="3"/>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

/// Handler writing every callback into a log
#[derive(Default)]
struct EventLog {
    lines: Vec<String>,
    open: usize,
    errors: Vec<String>,
}

impl XmpHandler for EventLog {
    type Schema = String;

    fn start_schema(&mut self, uri: &str, prefix: &str) -> XmpResult<String> {
        self.open += 1;
        self.lines.push(format!("start {} {}", prefix, uri));
        Ok(prefix.to_string())
    }

    fn end_schema(&mut self, schema: String) -> XmpResult<()> {
        self.open -= 1;
        self.lines.push(format!("end {}", schema));
        Ok(())
    }

    fn set_property(&mut self, schema: &String, name: &str, value: XmpValue) -> XmpResult<()> {
        self.lines.push(format!("{}:{} = {}", schema, name, value));
        Ok(())
    }

    fn error(&mut self, error: &XmpError) {
        self.errors.push(error.to_string());
    }
}

fn parse_chunked(input: &[u8], chunk: usize, options: ParseOptions) -> XmpResult<EventLog> {
    let mut context = XmpParseContext::new(EventLog::default(), options);
    for piece in input.chunks(chunk) {
        context.parse(piece)?;
    }
    context.end_parse()?;
    Ok(context.into_handler())
}

mod events {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn schemas_bracket_their_properties() {
        let log = parse_chunked(PACKET.as_bytes(), PACKET.len(), ParseOptions::default()).unwrap();

        assert_eq!(log.open, 0);
        assert!(log.errors.is_empty());
        assert_eq!(
            log.lines.first().map(String::as_str),
            Some("start dc http://purl.org/dc/elements/1.1/")
        );
        let dc_end = log.lines.iter().position(|l| l == "end dc").unwrap();
        let xmp_start = log.lines.iter().position(|l| l.starts_with("start xmp ")).unwrap();
        let rating = log.lines.iter().position(|l| l.starts_with("xmp:Rating")).unwrap();
        assert!(dc_end < xmp_start);
        assert!(xmp_start < rating);
        assert_eq!(
            log.lines.iter().filter(|l| l.starts_with("dc:")).count(),
            2
        );
    }

    #[test]
    fn state_follows_the_packet() {
        let mut context = XmpParseContext::new(EventLog::default(), ParseOptions::default());
        assert_eq!(context.state(), ParseState::Start);

        let split = PACKET.find("<rdf:RDF").unwrap();
        context.parse(PACKET[..split].as_bytes()).unwrap();
        assert_eq!(context.state(), ParseState::InsideXmpMeta);

        context.parse(PACKET[split..].as_bytes()).unwrap();
        assert_eq!(context.state(), ParseState::AfterXPacket);
        context.end_parse().unwrap();
        assert_eq!(context.handler().open, 0);
    }
}

mod chunking {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_chunk_size_gives_the_same_events() {
        let whole = parse_chunked(PACKET.as_bytes(), PACKET.len(), ParseOptions::default())
            .unwrap()
            .lines;
        for chunk in [1, 2, 3, 5, 16, 64] {
            let lines = parse_chunked(PACKET.as_bytes(), chunk, ParseOptions::default())
                .unwrap()
                .lines;
            assert_eq!(lines, whole, "chunk size {}", chunk);
        }
    }

    #[test]
    fn long_text_in_small_chunks() {
        let long = "x".repeat(64 * 1024);
        let packet = PACKET.replace("image/jpeg", &long);
        let log = parse_chunked(packet.as_bytes(), 7, ParseOptions::default()).unwrap();
        assert!(log.lines.contains(&format!("dc:format = {}", long)));
    }

    #[test]
    fn multibyte_text_split_anywhere() {
        let packet = PACKET.replace("image/jpeg", "caf\u{e9} \u{4e2d}\u{6587} \u{1f600}");
        for chunk in [1, 2, 3, 5] {
            let log = parse_chunked(packet.as_bytes(), chunk, ParseOptions::default()).unwrap();
            assert!(
                log.lines
                    .iter()
                    .any(|l| l == "dc:format = caf\u{e9} \u{4e2d}\u{6587} \u{1f600}"),
                "chunk size {}",
                chunk
            );
        }
    }

    #[test]
    fn empty_chunks_are_harmless() {
        let mut context = XmpParseContext::new(EventLog::default(), ParseOptions::default());
        context.parse(b"").unwrap();
        context.parse(PACKET.as_bytes()).unwrap();
        context.parse(b"").unwrap();
        context.end_parse().unwrap();
    }
}

mod find_xpacket {
    use super::*;
    use pretty_assertions::assert_eq;

    fn embedded() -> Vec<u8> {
        let mut data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        data.extend_from_slice(PACKET.as_bytes());
        data.extend((0..=255u8).rev().cycle().take(500));
        data
    }

    #[test]
    fn packet_inside_binary_data() {
        let options = ParseOptions::default().find_xpacket();
        for chunk in [7, 15, 16, 4096] {
            let log = parse_chunked(&embedded(), chunk, options).unwrap();
            assert!(
                log.lines.iter().any(|l| l == "dc:format = image/jpeg"),
                "chunk size {}",
                chunk
            );
            assert_eq!(log.open, 0);
        }
    }

    #[test]
    fn binary_data_without_search_fails() {
        let result = parse_chunked(&embedded(), 4096, ParseOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn no_packet_in_data() {
        let data = vec![0u8; 300];
        let result = parse_chunked(&data, 64, ParseOptions::default().find_xpacket());
        assert!(matches!(result, Err(XmpError::NoXPacket)));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn handler_sees_the_error_once() {
        let truncated = &PACKET.as_bytes()[..PACKET.len() - 40];
        let mut context = XmpParseContext::new(EventLog::default(), ParseOptions::default());
        context.parse(truncated).unwrap();
        assert!(context.end_parse().is_err());
        assert_eq!(context.state(), ParseState::Error);

        // the context stays unusable
        assert!(context.parse(b"<more/>").is_err());
        assert!(context.end_parse().is_err());
        assert_eq!(context.handler().errors.len(), 1);
    }

    #[test]
    fn bad_markup_fails_before_end_parse() {
        let packet = PACKET.replace("<dc:format>", "<!bogus><dc:format>");
        let mut context = XmpParseContext::new(EventLog::default(), ParseOptions::default());
        assert!(matches!(
            context.parse(packet.as_bytes()),
            Err(XmpError::ParseError(_))
        ));
        assert_eq!(context.state(), ParseState::Error);
        assert_eq!(context.handler().errors.len(), 1);
    }

    #[test]
    fn text_outside_a_property() {
        let packet = PACKET.replace("<dc:format>", "stray<dc:format>");
        let result = parse_chunked(packet.as_bytes(), 32, ParseOptions::default());
        assert!(matches!(result, Err(XmpError::InvalidContent(_))));
    }
}

mod base64_codec {
    use base64::Engine;
    use pretty_assertions::assert_eq;
    use xmpstream::base64 as codec;

    fn samples() -> Vec<Vec<u8>> {
        (0..70)
            .map(|len| (0..len).map(|i| (i * 37 + len) as u8).collect())
            .collect()
    }

    #[test]
    fn encode_matches_reference() {
        let reference = base64::engine::general_purpose::STANDARD;
        for input in samples() {
            assert_eq!(codec::encode(&input, 0), reference.encode(&input));

            let wrapped = codec::encode(&input, 76);
            assert_eq!(wrapped.len(), codec::encoded_len(input.len(), 76));
            assert_eq!(wrapped.replace('\n', ""), reference.encode(&input));
        }
    }

    #[test]
    fn decode_matches_reference() {
        let reference = base64::engine::general_purpose::STANDARD;
        for input in samples() {
            let text = reference.encode(&input);
            assert_eq!(codec::decode(&text, false).unwrap(), input);
        }
    }
}
