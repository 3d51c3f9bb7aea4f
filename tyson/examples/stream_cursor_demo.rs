// Example walking a TySON document with the pull cursor over a ChunkReader

use tyson::{ChunkReader, Cursor, CursorConfig, ParseError, Reader, ValueKind};

fn print_value<R: Reader>(cursor: &mut Cursor<R>, indent: usize) -> Result<(), ParseError> {
    let pad = "  ".repeat(indent);
    let kind = cursor.what_is_next()?;
    if kind.is_user_defined() {
        println!("{pad}🏷️  type: '{}'", cursor.recover_type_name()?);
    }
    match kind {
        ValueKind::Object | ValueKind::UserDefinedObject => {
            println!("{pad}🏁 Object");
            while let Some(name) = cursor.read_object()? {
                println!("{pad}  🔑 Key: '{name}'");
                print_value(cursor, indent + 2)?;
            }
        }
        ValueKind::Array | ValueKind::UserDefinedArray => {
            println!("{pad}📋 Array");
            while cursor.read_array()? {
                print_value(cursor, indent + 1)?;
            }
        }
        ValueKind::Number => println!("{pad}🔢 Number: {}", cursor.read_number()?),
        ValueKind::Boolean => println!("{pad}✅ Bool: {}", cursor.read_boolean()?),
        ValueKind::Null => {
            cursor.read_null()?;
            println!("{pad}⭕ Null");
        }
        ValueKind::String => println!("{pad}📝 String: '{}'", cursor.read_string()?),
        _ => println!("{pad}🔤 Literal: '{}'", cursor.read_literal()?),
    }
    Ok(())
}

fn main() -> Result<(), ParseError> {
    println!("🚀 Cursor Demo with ChunkReader");
    println!("===============================");

    let tyson = br#"("point") {"x": ("integer") "3", "y": -4.5, "tags": [("color") "red", true, null]}"#;

    println!("📄 Input: {}", String::from_utf8_lossy(tyson));
    println!("📏 Total size: {} bytes", tyson.len());
    println!();

    // Small chunks and a small window force refills mid-token
    let reader = ChunkReader::new(tyson, 8);
    let config = CursorConfig::new().with_buffer_size(16);
    let mut cursor = Cursor::with_config(reader, config);

    println!("🔄 Window: 16 bytes, chunk size: 8 bytes");
    println!();

    print_value(&mut cursor, 1)?;
    cursor.expect_end()?;

    println!();
    println!("✅ Walked the whole document through a 16 byte window!");
    Ok(())
}
