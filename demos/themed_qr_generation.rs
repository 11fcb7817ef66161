use std::error::Error;

use qrsmith::{ECLevel, MaskPattern, QRBuilder, Theme, Version};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows every configuration option and the built-in colour themes.";

    let symbol = QRBuilder::new(data.as_bytes())
        .min_version(Version::new(3)?)  // Version search starts here - defaults to 1
        .ec_level(ECLevel::H)           // Error correction level - defaults to ECLevel::M
        .mask(MaskPattern::try_new(2)?) // Mask pattern - if not provided, the lowest penalty mask wins
        .quiet_zone(4)                  // Light border in modules - defaults to 4
        .build()?;

    for name in ["mono", "cyber", "minimal"] {
        let theme: Theme = name.parse()?;
        let path = format!("themed_qr_{name}.png");
        symbol.render(6, &theme).save(&path)?;
        println!("{theme} QR code saved to: {path}");
    }

    let custom = Theme::from_hex("#1b4332", "#d8f3dc")?;
    symbol.render(6, &custom).save("themed_qr_custom.png")?;
    println!("{custom} QR code saved to: themed_qr_custom.png");

    println!("QR metadata: {}", symbol.metadata());
    Ok(())
}
