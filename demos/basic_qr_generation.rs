use std::error::Error;

use qrsmith::QRBuilder;

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings are automatically chosen
    let symbol = QRBuilder::new(b"Hello, World!").build()?;

    // Convert to image and save
    let img = symbol.to_image(4); // 4 pixels per module
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    println!("{}", symbol.to_str(1));
    Ok(())
}
