use catalog_runtime::*;
use image::ImageEncoder;
use std::path::Path;
use tokio::sync::mpsc;

fn write_png(path: &Path) {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 200, 90]));
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), 16, 16, image::ExtendedColorType::Rgb8)
        .unwrap();
    std::fs::write(path, out).unwrap();
}

fn spawn_worker() -> (
    mpsc::UnboundedSender<CatalogCommand>,
    mpsc::UnboundedReceiver<CatalogUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx)
}

/// Receive updates until one that is not progress arrives
async fn next_result(
    update_rx: &mut mpsc::UnboundedReceiver<CatalogUpdate>,
) -> (CatalogUpdate, Vec<ProgressEvent>) {
    let mut progress = Vec::new();
    loop {
        match update_rx.recv().await.unwrap() {
            CatalogUpdate::Progress(event) => progress.push(event),
            other => return (other, progress),
        }
    }
}

#[tokio::test]
async fn test_load_sheet_applies_filter() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("produtos.csv");
    std::fs::write(
        &sheet,
        "codigo,nome,ativo,imagem_principal,saldo_estoque,categoria\n\
         1,Aro 29,True,aro.png,3,Rodas\n\
         2,Pneu,False,pneu.png,3,Rodas\n\
         3,Selim,True,,3,Selins\n\
         4,Bomba,True,bomba.png,-1,Ferramentas\n",
    )
    .unwrap();

    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::LoadSheet {
            input_path: sheet,
            filter: ItemFilter::default(),
        })
        .unwrap();

    match next_result(&mut update_rx).await.0 {
        CatalogUpdate::SheetLoaded { items, total_rows } => {
            assert_eq!(total_rows, 4);
            let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
            assert_eq!(codes, vec!["1"]);
        }
        other => panic!("Expected SheetLoaded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_sheet_reports_error() {
    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::LoadSheet {
            input_path: "/nonexistent/sheet.csv".into(),
            filter: ItemFilter::default(),
        })
        .unwrap();

    match next_result(&mut update_rx).await.0 {
        CatalogUpdate::Error { message } => assert!(message.contains("Failed to load sheet")),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_writes_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("a.png"));

    let items: Vec<CatalogItem> = (0..5)
        .map(|i| {
            CatalogItem::new(format!("C{}", i), format!("Produto {}", i))
                .with_category(if i < 3 { "Rodas" } else { "Freios" })
                .with_image(if i == 4 { "missing.png" } else { "a.png" })
        })
        .collect();
    let options = CatalogOptions {
        yield_pause_ms: 0,
        ..Default::default()
    };

    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::Generate {
            items,
            options,
            output_dir: dir.path().to_path_buf(),
            image_dir: Some(dir.path().to_path_buf()),
            logo_path: Some(dir.path().join("a.png")),
        })
        .unwrap();

    let (result, progress) = next_result(&mut update_rx).await;
    match result {
        CatalogUpdate::Complete {
            path,
            page_count,
            item_count,
            images_failed,
        } => {
            // cover, index, 2 x (intro + content)
            assert_eq!(page_count, 6);
            assert_eq!(item_count, 5);
            assert_eq!(images_failed, 1);
            assert!(path.exists());
            assert!(
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("catalogo-produtos-")
            );
        }
        other => panic!("Expected Complete, got {:?}", other),
    }

    assert!(!progress.is_empty());
    assert_eq!(progress.last().unwrap().status, ProgressStatus::Complete);
}

#[tokio::test]
async fn test_generate_without_items() {
    let dir = tempfile::tempdir().unwrap();
    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::Generate {
            items: Vec::new(),
            options: CatalogOptions::default(),
            output_dir: dir.path().to_path_buf(),
            image_dir: None,
            logo_path: None,
        })
        .unwrap();

    let (result, progress) = next_result(&mut update_rx).await;
    assert!(matches!(result, CatalogUpdate::EmptySelection));
    assert!(progress.is_empty());
}

#[tokio::test]
async fn test_load_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, r#"{ "rows": 3, "group_by_category": false }"#).unwrap();

    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::LoadConfig { path })
        .unwrap();

    match next_result(&mut update_rx).await.0 {
        CatalogUpdate::ConfigLoaded { options } => {
            assert_eq!(options.rows, 3);
            assert!(!options.group_by_category);
        }
        other => panic!("Expected ConfigLoaded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_commands_run_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("sheet.csv");
    std::fs::write(&sheet, "code,name,image\nX,Item,x.png\n").unwrap();

    let (command_tx, mut update_rx) = spawn_worker();
    command_tx
        .send(CatalogCommand::LoadConfig {
            path: dir.path().join("missing.json"),
        })
        .unwrap();
    command_tx
        .send(CatalogCommand::LoadSheet {
            input_path: sheet,
            filter: ItemFilter::default(),
        })
        .unwrap();

    assert!(matches!(
        next_result(&mut update_rx).await.0,
        CatalogUpdate::Error { .. }
    ));
    assert!(matches!(
        next_result(&mut update_rx).await.0,
        CatalogUpdate::SheetLoaded { .. }
    ));
}
