#![no_main]

use codec::{DecoderConfig, Dispatcher, VecSink};
use libfuzzer_sys::fuzz_target;
use parsers::{Opcode, OpcodeMap};
use wire::{MessageHeader, ProtocolBuild};

const BUILD: ProtocolBuild = ProtocolBuild::new(38835);

fuzz_target!(|data: &[u8]| {
    let opcodes = Opcode::ALL
        .into_iter()
        .zip(1_u32..)
        .fold(OpcodeMap::new(), |map, (opcode, code)| map.with(opcode, code));
    let Ok(decoder) = parsers::decoder(&opcodes, DecoderConfig::for_testing()) else {
        return;
    };
    let mut dispatcher = Dispatcher::new(decoder, VecSink::new());

    // Each frame is a code byte, a length byte and that many payload bytes.
    let mut idx = 0usize;
    let mut number = 0u64;
    while idx + 2 <= data.len() && number < 256 {
        let code = u32::from(data[idx] % 12);
        let len = data[idx + 1] as usize;
        idx += 2;
        let end = (idx + len).min(data.len());
        let payload = &data[idx..end];
        idx = end;

        let header = MessageHeader::new(code.into(), BUILD, payload.len() as u32).with_number(number);
        let _ = dispatcher.decode(header, payload);
        number += 1;
    }

    let stats = dispatcher.stats();
    assert_eq!(stats.messages, number);
});
