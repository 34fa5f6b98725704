diesel::table! {
    sales_lines (id) {
        id -> Integer,
        month -> Date,
        counterparty -> Text,
        quantity -> Text,
        product_code -> Text,
        product_name -> Text,
        lot_number -> Text,
    }
}
