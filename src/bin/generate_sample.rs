use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

struct Order {
    id: i64,
    customer: String,
    city: &'static str,
    product: &'static str,
    note: &'static str,
    amount: f64,
}

const CUSTOMERS: &[&str] = &["Alice", "bob", "ALICE", "Carol", "Dave", "Eve"];
const CITIES: &[&str] = &["Oslo", "Bergen", "Trondheim", "Stavanger"];
const PRODUCTS: &[&str] = &["Red widget", "Blue widget", "Gadget", "Gizmo (large)"];
const NOTES: &[&str] = &["", "urgent", "gift wrap", "call before delivery", "URGENT refund"];

fn generate_orders(rng: &mut SimpleRng, count: i64) -> Vec<Order> {
    (1..=count)
        .map(|id| Order {
            id,
            customer: format!("{} {}", rng.pick(CUSTOMERS), id),
            city: rng.pick(CITIES),
            product: rng.pick(PRODUCTS),
            note: rng.pick(NOTES),
            amount: (rng.below(50_000) as f64) / 100.0,
        })
        .collect()
}

/// Title row, a two-row header with gaps and repeats, then the orders.
fn write_xlsx(orders: &[Order], path: &str) -> Result<(), rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Orders")?;

    sheet.write_string(0, 0, "Quarterly order export")?;

    let upper = ["Order", "Customer", "Customer", "Item", "Item", "nan"];
    let lower = ["", "Name", "City", "Name", "", ""];
    for (col, (u, l)) in upper.iter().zip(lower).enumerate() {
        sheet.write_string(1, col as u16, *u)?;
        if !l.is_empty() {
            sheet.write_string(2, col as u16, l)?;
        }
    }

    for (i, order) in orders.iter().enumerate() {
        let row = (i + 3) as u32;
        sheet.write_number(row, 0, order.id as f64)?;
        sheet.write_string(row, 1, &order.customer)?;
        sheet.write_string(row, 2, order.city)?;
        sheet.write_string(row, 3, order.product)?;
        sheet.write_number(row, 4, order.amount)?;
        if !order.note.is_empty() {
            sheet.write_string(row, 5, order.note)?;
        }
    }

    workbook.save(path)
}

fn write_parquet(orders: &[Order], path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Int64, false),
        Field::new("customer", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("amount", DataType::Float64, false),
        Field::new("note", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(orders.iter().map(|o| o.id))),
            Arc::new(StringArray::from_iter_values(
                orders.iter().map(|o| o.customer.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(orders.iter().map(|o| o.city))),
            Arc::new(StringArray::from_iter_values(orders.iter().map(|o| o.product))),
            Arc::new(Float64Array::from_iter_values(orders.iter().map(|o| o.amount))),
            Arc::new(StringArray::from_iter(
                orders
                    .iter()
                    .map(|o| (!o.note.is_empty()).then_some(o.note)),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let orders = generate_orders(&mut rng, 500);

    let xlsx_path = "sample_orders.xlsx";
    write_xlsx(&orders, xlsx_path).expect("Failed to write workbook");

    let parquet_path = "sample_orders.parquet";
    write_parquet(&orders, parquet_path);

    println!(
        "Wrote {} orders to {xlsx_path} (header rows 1-2) and {parquet_path}",
        orders.len()
    );
}
