use etk_asm::ingest::Ingest;

const PRELUDE: &str = r#"
%macro dispatch_begin()
  push1 0x00
  calldataload
  push1 0xe0   # 28 byte shift == 224 bits
  shr
%end

%macro dispatch(method, lbl)
  dup1
  %push($method)
  eq
  %push($lbl)
  jumpi
%end

%macro dispatch_end()
  push1 0x00
  dup1
  revert
%end
"#;

#[allow(dead_code)]
/// Assembles contract code.
/// Arguments:
/// - name is the name of the contract, for debug purposes.
/// - body is the contract code; the dispatch macros above are in scope.
pub fn new_contract(name: &str, body: &str) -> Result<Vec<u8>, etk_asm::ingest::Error> {
    let mut code = Vec::new();
    let mut ingest = Ingest::new(&mut code);
    let body_with_prelude = PRELUDE.to_owned() + body;
    ingest.ingest(name, body_with_prelude.as_str())?;
    Ok(code)
}
