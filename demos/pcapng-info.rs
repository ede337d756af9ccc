use pcapng_decode::*;
use std::collections::BTreeMap;
use std::env;
use std::error::Error;
use std::fs::File;

fn main() {
    env_logger::builder().try_init().ok();
    for arg in env::args().skip(1) {
        if let Err(e) = print_pcapng_info(&arg) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn print_pcapng_info(arg: &str) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let file = File::open(arg)?;
    let file_size = file.metadata()?.len();
    println!("\tfile size: {}", file_size);

    let mut reader = PcapNGReader::new(10 * 1024, file)?;

    match reader.peek_type()? {
        Some(BlockType::SectionHeader) => println!("\tformat: Pcap-NG file"),
        _ => return Err("first block is not a section header".into()),
    }

    let mut counts = BTreeMap::new();
    let mut interfaces = Vec::new();
    for block in reader.all_blocks() {
        let block = block?;
        print_block_info(&block, &mut interfaces);
        *counts.entry(format!("{:?}", block.block_type())).or_insert(0usize) += 1;
    }

    let num_blocks: usize = counts.values().sum();
    println!("\tnum_blocks: {}", num_blocks);
    for (kind, count) in &counts {
        println!("\t\t{}: {}", kind, count);
    }

    Ok(())
}

fn print_block_info(block: &Block, interfaces: &mut Vec<InterfaceDescriptionBlock>) {
    match block {
        Block::SectionHeader(shb) => {
            interfaces.clear();
            println!("\t\tNew Section");
            println!("\t\t\tVersion: {}.{}", shb.major_version, shb.minor_version);
            if !shb.byte_order_matches() {
                println!("\t\t\tbyte order: big-endian (not supported)");
            }
            if let Some(hardware) = &shb.hardware {
                println!("\t\t\tshb_hardware: {}", hardware);
            }
            if let Some(os) = &shb.os {
                println!("\t\t\tshb_os: {}", os);
            }
            if let Some(userappl) = &shb.user_application {
                println!("\t\t\tshb_userappl: {}", userappl);
            }
        }
        Block::InterfaceDescription(idb) => {
            println!("\t\tNew interface {}", interfaces.len());
            println!("\t\t\tlinktype: {}", idb.linktype);
            println!("\t\t\tsnaplen: {}", idb.snaplen);
            if let Some(name) = &idb.name {
                println!("\t\t\tif_name: {}", name);
            }
            if let Some(description) = &idb.description {
                println!("\t\t\tif_description: {}", description);
            }
            if let Some(os) = &idb.os {
                println!("\t\t\tif_os: {}", os);
            }
            println!("\t\t\tif_tsresol: {}", idb.ts_resolution_or_default());
            if let Some(offset) = idb.ts_offset {
                println!("\t\t\tif_tsoffset: {}", offset);
            }
            interfaces.push(idb.clone());
        }
        Block::EnhancedPacket(epb) => {
            let ts = match interfaces.get(epb.interface_id as usize) {
                Some(idb) => match epb.timestamp_ticks_with(idb) {
                    Ok((ticks, true)) => format!("{} (truncated)", ticks),
                    Ok((ticks, false)) => ticks.to_string(),
                    Err(e) => format!("<{}>", e),
                },
                None => format!("{} (unknown interface)", epb.timestamp_ticks()),
            };
            println!(
                "\t\tPacket: if={} len={}/{} ts={}",
                epb.interface_id, epb.captured_length, epb.data_length, ts
            );
        }
        Block::NameResolution(nrb) => {
            for record in &nrb.records {
                println!(
                    "\t\tName: {} -> {}",
                    record.address,
                    record.dns_entries.join(", ")
                );
            }
        }
        Block::InterfaceStatistics(isb) => {
            println!("\t\tStatistics for interface {}", isb.interface_id);
            if let Some(received) = isb.packets_received {
                println!("\t\t\tisb_ifrecv: {}", received);
            }
            if let Some(dropped) = isb.packets_dropped {
                println!("\t\t\tisb_ifdrop: {}", dropped);
            }
        }
        _ => (),
    }
    if let Some(comment) = block.comment() {
        println!("\t\t\tcomment: {}", comment);
    }
}
