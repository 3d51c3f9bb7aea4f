// Example building owned value trees, with and without a cursor pool

use tyson::{CursorPool, ParseError, Value};

fn main() -> Result<(), ParseError> {
    let doc = r#"("order") {"id": 17, "lines": [("sku") "A-1", ("sku") "B-2"], "paid": ("boolean") "true"}"#;
    println!("Input: {}", doc);

    let value = tyson::from_str(doc)?;
    println!("Type: {:?}", value.type_name());
    let order = value.untyped();
    println!("id: {:?}", order.get("id").and_then(Value::as_i64));
    println!("paid: {:?}", order.get("paid").and_then(Value::as_bool));
    for line in order.get("lines").and_then(Value::as_array).unwrap_or(&[]) {
        println!(
            "line {:?}: {:?}",
            line.type_name(),
            line.untyped().as_str()
        );
    }

    println!();
    println!("Reusing cursors from a pool:");
    let pool = CursorPool::new(2);
    for doc in ["[1, 2, 3]", r#"("celsius") 21.5"#, r#"{"ok": null}"#] {
        let mut cursor = pool.borrow(doc.as_bytes());
        let value = cursor.read_value()?;
        cursor.expect_end()?;
        println!("  {doc} => {value:?}");
    }
    println!("Idle cursors: {}", pool.idle_count());
    Ok(())
}
